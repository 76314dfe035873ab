//! Hack VM Translator Driver
//! 
//! Translates a single `.vm` file, or every `.vm` file in a directory, into
//! one Hack assembly file.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::{debug, info, LevelFilter};
use serde_json::json;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use vmt_codegen::{CodeWriter, TranslatorOptions};
use vmt_frontend::Frontend;

/// Name of the unit whose presence turns the bootstrap on by default
const SYSTEM_UNIT: &str = "Sys";

#[derive(Parser, Debug)]
#[command(name = "vmt")]
#[command(about = "Hack VM Translator - translates VM code into Hack assembly")]
#[command(version)]
struct Cli {
    /// Input .vm file, or a directory of .vm files
    input: PathBuf,

    /// Output assembly file (defaults to X.asm, or D/D.asm for a directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Always emit the bootstrap sequence
    #[arg(long, conflicts_with = "no_bootstrap")]
    bootstrap: bool,

    /// Never emit the bootstrap sequence
    #[arg(long)]
    no_bootstrap: bool,

    /// Terminate the program with an infinite loop
    #[arg(long)]
    halt_loop: bool,

    /// Omit the `// <command>` comment lines
    #[arg(long)]
    no_comments: bool,

    /// Print the parsed commands as JSON instead of translating
    #[arg(long)]
    dump_commands: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// One parsed source file
struct Unit {
    name: String,
    path: PathBuf,
    source: String,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let inputs = collect_inputs(&cli.input)?;
    let units = load_units(&inputs)?;

    if cli.dump_commands {
        return dump_commands(&units);
    }

    let output = match &cli.output {
        Some(path) => path.clone(),
        None => default_output(&cli.input)?,
    };
    let bootstrap = if cli.bootstrap {
        true
    } else if cli.no_bootstrap {
        false
    } else {
        units.iter().any(|u| u.name == SYSTEM_UNIT)
    };
    let options = TranslatorOptions {
        emit_comments: !cli.no_comments,
        ..Default::default()
    };

    let written = translate(&units, &output, options, bootstrap, cli.halt_loop)?;
    info!(
        "Wrote {} instructions from {} file(s) to {}",
        written,
        units.len(),
        output.display()
    );
    Ok(())
}

/// The input file itself, or the directory's `.vm` files in name order
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let mut files = Vec::new();
        for entry in fs::read_dir(input)
            .with_context(|| format!("Failed to read directory {}", input.display()))?
        {
            let path = entry?.path();
            if path.is_file() && is_vm_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        if files.is_empty() {
            bail!("No .vm files found in {}", input.display());
        }
        Ok(files)
    } else if is_vm_file(input) {
        Ok(vec![input.to_path_buf()])
    } else {
        bail!("Argument was not a .vm file or directory: {}", input.display());
    }
}

fn is_vm_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "vm")
}

/// X.vm -> X.asm; D/ -> D/D.asm
fn default_output(input: &Path) -> Result<PathBuf> {
    if input.is_dir() {
        let name = dir_name(input)?;
        Ok(input.join(format!("{}.asm", name)))
    } else {
        Ok(input.with_extension("asm"))
    }
}

fn dir_name(dir: &Path) -> Result<String> {
    let resolved = dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", dir.display()))?;
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Directory has no name: {}", dir.display()))
}

fn load_units(inputs: &[PathBuf]) -> Result<Vec<Unit>> {
    inputs
        .iter()
        .map(|path| -> Result<Unit> {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .with_context(|| format!("Invalid file name: {}", path.display()))?;
            // `$` is reserved for translator-generated labels
            if name.contains('$') {
                bail!("Unit name may not contain '$': {}", path.display());
            }
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(Unit { name, path: path.clone(), source })
        })
        .collect()
}

fn dump_commands(units: &[Unit]) -> Result<()> {
    let mut dump = Vec::new();
    for unit in units {
        let commands = Frontend::parse_source(&unit.source, &unit.path.display().to_string())?;
        let commands: Vec<_> = commands
            .iter()
            .map(|cmd| json!({ "kind": cmd.kind(), "arg1": cmd.arg1(), "arg2": cmd.arg2() }))
            .collect();
        dump.push(json!({ "unit": unit.name, "commands": commands }));
    }
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

/// Translate all units into `output` with one shared translator
fn translate(
    units: &[Unit],
    output: &Path,
    options: TranslatorOptions,
    bootstrap: bool,
    halt_loop: bool,
) -> Result<usize> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = CodeWriter::new(file, options);

    if bootstrap {
        writer.write_bootstrap()?;
    }
    for unit in units {
        info!("Translating {}", unit.path.display());
        writer.set_current_unit(&unit.name);
        let filename = unit.path.display().to_string();
        writer
            .write_commands(vmt_frontend::Parser::new(&unit.source, &filename))
            .with_context(|| format!("Failed to translate {}", unit.path.display()))?;
    }
    if halt_loop {
        writer.write_halt_loop()?;
    }

    let state = writer.translator().state();
    debug!(
        "{} comparison labels, {} call sites",
        state.labels_allocated(),
        state.calls_emitted()
    );
    let written = writer.instructions_written();
    writer.finish()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_output_names() {
        let tmp = TempDir::new().unwrap();
        let file = write(tmp.path(), "StackTest.vm", "add\n");
        assert_eq!(default_output(&file).unwrap(), tmp.path().join("StackTest.asm"));

        let dir = tmp.path().join("FibonacciElement");
        fs::create_dir(&dir).unwrap();
        assert_eq!(
            default_output(&dir).unwrap(),
            dir.join("FibonacciElement.asm")
        );
    }

    #[test]
    fn test_collect_inputs_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Sys.vm", "");
        write(tmp.path(), "Main.vm", "");
        write(tmp.path(), "notes.txt", "");
        let inputs = collect_inputs(tmp.path()).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Main.vm", "Sys.vm"]);
    }

    #[test]
    fn test_collect_inputs_rejects_other_files() {
        let tmp = TempDir::new().unwrap();
        let txt = write(tmp.path(), "prog.txt", "");
        assert!(collect_inputs(&txt).is_err());
        let empty = tmp.path().join("empty");
        fs::create_dir(&empty).unwrap();
        assert!(collect_inputs(&empty).is_err());
    }

    #[test]
    fn test_unit_names_with_dollar_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "VM$$Bootstrap.vm", "add\n");
        let err = load_units(&[path]).err().unwrap();
        assert!(err.to_string().contains("may not contain '$'"));
    }

    #[test]
    fn test_translate_directory_with_bootstrap() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Main.vm", "function Main.main 0\npush static 0\nreturn\n");
        write(
            tmp.path(),
            "Sys.vm",
            "function Sys.init 0\ncall Main.main 0\nlabel END\ngoto END\n",
        );
        let units = load_units(&collect_inputs(tmp.path()).unwrap()).unwrap();
        let out = tmp.path().join("out.asm");

        translate(&units, &out, TranslatorOptions::default(), true, false).unwrap();
        let text = fs::read_to_string(&out).unwrap();

        assert!(text.starts_with("// bootstrap\n@256\nD=A\n@SP\nM=D\n"));
        assert_eq!(text.matches("// bootstrap").count(), 1);
        assert!(text.contains("@Main.0\n"));
        assert!(text.contains("(Sys.Sys.init$END)\n"));
    }

    #[test]
    fn test_translate_reports_bad_line() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Bad.vm", "push constant 1\npush nowhere 2\n");
        let units = load_units(&collect_inputs(tmp.path()).unwrap()).unwrap();
        let out = tmp.path().join("Bad.asm");

        let err = translate(&units, &out, TranslatorOptions::default(), false, false).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Failed to translate"));
        assert!(message.contains("unknown segment 'nowhere'"));
        assert!(message.contains(":2:6"));
    }
}

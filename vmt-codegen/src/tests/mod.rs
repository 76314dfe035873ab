//! Execution tests: translate VM code and run it on the simulated CPU

mod call_tests;

use crate::asm::AsmInst;
use crate::lower::Translator;
use crate::TranslatorOptions;
use sim::{HackCpu, StopReason};
use vmt_frontend::Frontend;

const MAX_STEPS: usize = 200_000;
const SP: u16 = 0;
const LCL: u16 = 1;
const ARG: u16 = 2;
const THIS: u16 = 3;
const THAT: u16 = 4;

/// VM code leaving `value` on the stack, including values `push constant`
/// cannot express directly
fn push_value(value: i16) -> String {
    if value == i16::MIN {
        "push constant 32767\nneg\npush constant 1\nsub\n".to_string()
    } else if value < 0 {
        format!("push constant {}\nneg\n", -(value as i32))
    } else {
        format!("push constant {}\n", value)
    }
}

/// Translate the given (unit, source) pairs in order with one translator
fn translate_units(units: &[(&str, &str)], bootstrap: bool) -> Vec<AsmInst> {
    let mut translator = Translator::new(TranslatorOptions::default());
    let mut insts = Vec::new();
    if bootstrap {
        insts.extend(translator.bootstrap().unwrap());
    }
    for (unit, source) in units {
        translator.set_current_unit(unit);
        let commands = Frontend::parse_source(source, &format!("{}.vm", unit)).unwrap();
        for cmd in &commands {
            insts.extend(translator.translate(cmd).unwrap());
        }
    }
    insts
}

/// Run a bare command sequence with SP at 256 and no bootstrap
fn run_snippet(source: &str) -> HackCpu {
    run_snippet_with(source, |_| {})
}

fn run_snippet_with(source: &str, setup: impl FnOnce(&mut HackCpu)) -> HackCpu {
    let insts = translate_units(&[("Test", source)], false);
    let mut cpu = HackCpu::load(&insts);
    cpu.set_ram(SP, 256);
    setup(&mut cpu);
    assert_eq!(cpu.run(MAX_STEPS), StopReason::EndOfProgram);
    cpu
}

/// Run a full program through the bootstrap until it parks in a halt loop
fn run_program(units: &[(&str, &str)]) -> HackCpu {
    run_program_with(units, |_| {})
}

fn run_program_with(units: &[(&str, &str)], setup: impl FnOnce(&mut HackCpu)) -> HackCpu {
    let insts = translate_units(units, true);
    let mut cpu = HackCpu::load(&insts);
    setup(&mut cpu);
    assert_eq!(cpu.run(MAX_STEPS), StopReason::Halted);
    cpu
}

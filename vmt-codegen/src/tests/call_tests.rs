use super::*;
use crate::emit::CodeWriter;
use indoc::indoc;

/// Bootstrap: SP=256, then the Sys.init frame occupies 256..=260
const SYS_ARG: i16 = 256;
const SYS_LCL: i16 = 261;

const SYS_CALLS_ADD: &str = indoc! {"
    function Sys.init 0
    push constant 3000
    pop pointer 0
    push constant 4000
    pop pointer 1
    push constant 1
    push constant 2
    call Foo.add 2
    pop temp 0
    label HALT
    goto HALT
"};

const FOO_ADD: &str = indoc! {"
    function Foo.add 2
    push local 0
    push local 1
    add
    push argument 0
    add
    push argument 1
    add
    push constant 5
    pop pointer 0
    push constant 6
    pop pointer 1
    return
"};

#[test]
fn test_call_return_restores_caller() {
    let cpu = run_program_with(&[("Sys", SYS_CALLS_ADD), ("Foo", FOO_ADD)], |cpu| {
        // stale data where the callee's locals will live
        for addr in 256..400 {
            cpu.set_ram(addr, 0x5555);
        }
    });

    // single return value sits where the two arguments were; popped into temp 0
    assert_eq!(cpu.ram(5), 3);
    assert_eq!(cpu.ram(SP), SYS_LCL);
    assert_eq!(cpu.ram(LCL), SYS_LCL);
    assert_eq!(cpu.ram(ARG), SYS_ARG);
    assert_eq!(cpu.ram(THIS), 3000);
    assert_eq!(cpu.ram(THAT), 4000);
}

#[test]
fn test_return_value_replaces_arguments() {
    let sys = indoc! {"
        function Sys.init 0
        push constant 1
        push constant 2
        call Foo.add 2
        label HALT
        goto HALT
    "};
    let cpu = run_program(&[("Sys", sys), ("Foo", FOO_ADD)]);
    assert_eq!(cpu.ram(SP), SYS_LCL + 1);
    assert_eq!(cpu.ram(SYS_LCL as u16), 3);
}

#[test]
fn test_zero_argument_call() {
    // with no arguments the return value overwrites the saved return address slot
    let sys = indoc! {"
        function Sys.init 0
        call Main.nine 0
        push constant 1
        add
        pop temp 1
        label HALT
        goto HALT
    "};
    let main = indoc! {"
        function Main.nine 0
        push constant 9
        return
    "};
    let cpu = run_program(&[("Sys", sys), ("Main", main)]);
    assert_eq!(cpu.ram(6), 10);
    assert_eq!(cpu.ram(SP), SYS_LCL);
}

#[test]
fn test_recursive_fibonacci() {
    let sys = indoc! {"
        function Sys.init 0
        push constant 10
        call Main.fib 1
        pop temp 0
        label HALT
        goto HALT
    "};
    let main = indoc! {"
        function Main.fib 0
        push argument 0
        push constant 2
        lt
        if-goto BASE
        push argument 0
        push constant 1
        sub
        call Main.fib 1
        push argument 0
        push constant 2
        sub
        call Main.fib 1
        add
        return
        label BASE
        push argument 0
        return
    "};
    let cpu = run_program(&[("Sys", sys), ("Main", main)]);
    assert_eq!(cpu.ram(5), 55);
    assert_eq!(cpu.ram(SP), SYS_LCL);
}

#[test]
fn test_nested_calls_keep_locals() {
    let sys = indoc! {"
        function Sys.init 0
        push constant 4
        call Main.outer 1
        pop temp 0
        label HALT
        goto HALT
    "};
    let main = indoc! {"
        function Main.outer 2
        push constant 100
        pop local 1
        push argument 0
        call Main.inner 1
        pop local 0
        push local 0
        push local 1
        add
        return
        function Main.inner 1
        label HALT
        push argument 0
        push argument 0
        add
        return
    "};
    let cpu = run_program(&[("Sys", sys), ("Main", main)]);
    assert_eq!(cpu.ram(5), 108);
    assert_eq!(cpu.ram(LCL), SYS_LCL);
}

#[test]
fn test_statics_shared_across_functions_of_a_unit() {
    let sys = indoc! {"
        function Sys.init 0
        call Counter.bump 0
        pop temp 0
        call Counter.bump 0
        pop temp 0
        call Counter.get 0
        pop temp 0
        push static 0
        pop temp 1
        label HALT
        goto HALT
    "};
    let counter = indoc! {"
        function Counter.bump 0
        push static 0
        push constant 1
        add
        pop static 0
        push constant 0
        return
        function Counter.get 0
        push static 0
        return
    "};
    let cpu = run_program(&[("Sys", sys), ("Counter", counter)]);
    assert_eq!(cpu.ram(5), 2);
    // Sys.0 is a different slot and was never written
    assert_eq!(cpu.ram(6), 0);
}

#[test]
fn test_bootstrap_emitted_once_for_many_units() {
    let mut writer = CodeWriter::new(Vec::new(), TranslatorOptions::default());
    writer.write_bootstrap().unwrap();
    for (unit, source) in [("Sys", SYS_CALLS_ADD), ("Foo", FOO_ADD)] {
        writer.set_current_unit(unit);
        let commands = Frontend::parse_source(source, unit).unwrap();
        for cmd in &commands {
            writer.write_command(cmd).unwrap();
        }
    }
    writer.write_halt_loop().unwrap();
    let text = String::from_utf8(writer.finish().unwrap()).unwrap();

    assert_eq!(text.matches("// bootstrap").count(), 1);
    assert_eq!(text.matches("@256\nD=A\n@SP\nM=D\n").count(), 1);
    assert_eq!(text.matches("@Sys.init\n0;JMP\n").count(), 1);
    assert!(text.ends_with("(VM$$HALT)\n@VM$$HALT\n0;JMP\n"));
}

//! Tests for the program listing.

use blank_core::Colors;

use crate::dump::{dump, format_instruction};
use crate::instruction::{Instruction, Label};
use crate::program::Program;

fn l(v: u64) -> Label {
    Label::new(v)
}

#[test]
fn dump_loop() {
    let program = Program::new(vec![
        Instruction::Mark(l(1)),
        Instruction::Push(1),
        Instruction::OutN,
        Instruction::Jump(l(1)),
    ]);

    insta::assert_snapshot!(dump(&program, Colors::OFF), @r"
    [labels]
    L1 = 0

    [code]
      0  mark L1
      1  push 1
      2  outn
      3  jump L1            -> 0
    ");
}

#[test]
fn dump_flags_shadowed_and_unresolved() {
    let program = Program::new(vec![
        Instruction::Mark(l(2)),
        Instruction::Push(-3),
        Instruction::Mark(l(2)),
        Instruction::Call(l(7)),
        Instruction::Jz(l(2)),
        Instruction::Exit,
    ]);

    insta::assert_snapshot!(dump(&program, Colors::OFF), @r"
    [labels]
    L2 = 2

    [code]
      0  mark L2            ; shadowed
      1  push -3
      2  mark L2
      3  call L7            -> ?
      4  jz L2              -> 2
      5  exit
    ");
}

#[test]
fn dump_without_labels_has_only_code() {
    let program = Program::new(vec![Instruction::Push(0), Instruction::Exit]);
    let out = dump(&program, Colors::OFF);
    assert!(!out.contains("[labels]"));
    assert!(out.starts_with("[code]\n"));
}

#[test]
fn dump_empty_program() {
    assert_eq!(dump(&Program::default(), Colors::OFF), "[code]\n");
}

#[test]
fn dump_pads_indices_to_widest() {
    let mut instrs = vec![Instruction::Push(1); 10];
    instrs.push(Instruction::Exit);
    let out = dump(&Program::new(instrs), Colors::OFF);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[1], "  00  push 1");
    assert_eq!(lines[11], "  10  exit");
}

#[test]
fn format_instruction_colors_arguments() {
    let c = Colors::ON;
    assert_eq!(
        format_instruction(&Instruction::Push(5), c),
        format!("push {}5{}", c.literal, c.reset)
    );
    assert_eq!(
        format_instruction(&Instruction::Call(l(3)), c),
        format!("call {}L3{}", c.label, c.reset)
    );
    assert_eq!(format_instruction(&Instruction::Ret, c), "ret");
}

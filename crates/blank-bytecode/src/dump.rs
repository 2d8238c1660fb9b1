//! Human-readable program listing for debugging.
//!
//! ```text
//! [labels]
//! L1 = 0
//!
//! [code]
//!   0  mark L1
//!   1  push 1
//!   2  outn
//!   3  jump L1            -> 0
//! ```

use std::fmt::Write as _;

use blank_core::Colors;
use blank_core::utils::{pad_to, width_for_count};

use super::instruction::Instruction;
use super::program::Program;

/// Column layout shared by dump and trace lines.
pub mod cols {
    /// Leading indentation (2 spaces).
    pub const INDENT: usize = 2;
    /// Gap between the index and the instruction (2 spaces).
    pub const GAP: usize = 2;
    /// Column where annotations (targets, notes) start.
    pub const NOTE: usize = 24;
}

/// Generate a human-readable listing of the program.
pub fn dump(program: &Program, colors: Colors) -> String {
    let mut out = String::new();
    dump_labels(&mut out, program, colors);
    dump_code(&mut out, program, colors);
    out
}

fn dump_labels(out: &mut String, program: &Program, colors: Colors) {
    let c = colors;
    let mut labels = program.labels().peekable();
    if labels.peek().is_none() {
        return;
    }

    writeln!(out, "{}", c.paint(c.heading, "[labels]")).unwrap();
    for (label, index) in labels {
        writeln!(out, "{} = {index}", c.paint(c.label, label)).unwrap();
    }
    out.push('\n');
}

fn dump_code(out: &mut String, program: &Program, colors: Colors) {
    let c = colors;
    let width = width_for_count(program.len());

    writeln!(out, "{}", c.paint(c.heading, "[code]")).unwrap();
    for (ip, instr) in program.instructions().iter().enumerate() {
        let base = format!(
            "{:indent$}{}{:gap$}{}",
            "",
            c.paint(c.muted, format_args!("{ip:0width$}")),
            "",
            format_instruction(instr, colors),
            indent = cols::INDENT,
            gap = cols::GAP,
        );

        let note = if let Some(label) = instr.target() {
            match program.resolve(label) {
                Some(target) => Some(c.paint(c.muted, format_args!("-> {target}"))),
                None => Some(c.paint(c.error, "-> ?")),
            }
        } else if matches!(instr, Instruction::Mark(_)) && program.is_shadowed(ip) {
            Some(c.paint(c.muted, "; shadowed"))
        } else {
            None
        };

        match note {
            Some(note) => writeln!(out, "{}{note}", pad_to(&base, cols::NOTE)).unwrap(),
            None => writeln!(out, "{base}").unwrap(),
        }
    }
}

/// Format an instruction as `mnemonic [argument]` with the argument colored.
pub fn format_instruction(instr: &Instruction, colors: Colors) -> String {
    let c = colors;
    let mnemonic = instr.opcode().mnemonic();
    match *instr {
        Instruction::Push(v) => format!("{mnemonic} {}", c.paint(c.literal, v)),
        Instruction::Copy(n) | Instruction::Slide(n) => {
            format!("{mnemonic} {}", c.paint(c.literal, n))
        }
        Instruction::Mark(l)
        | Instruction::Call(l)
        | Instruction::Jump(l)
        | Instruction::Jz(l)
        | Instruction::Jn(l) => format!("{mnemonic} {}", c.paint(c.label, l)),
        _ => mnemonic.to_string(),
    }
}

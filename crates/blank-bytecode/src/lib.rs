//! Instruction set and program representation for blank.
//!
//! This crate contains:
//! - The closed opcode set with its whitespace codewords (`Opcode`, `Instruction`)
//! - The decoded program with its label map (`Program`)
//! - A human-readable listing (`dump`)

pub mod dump;
pub mod instruction;
pub mod program;

#[cfg(test)]
mod dump_tests;

pub use dump::{dump, format_instruction};
pub use instruction::{Instruction, Label, Opcode, Ws, encode_all};
pub use program::{LabelRef, Program};

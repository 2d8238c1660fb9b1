//! Errors that can occur during program execution.

use std::io;
use std::sync::Arc;

use blank_bytecode::{Instruction, Label};

/// Why execution stopped abnormally.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    /// An instruction needed more operands than the stack holds.
    #[error("stack underflow: needed {needed}, had {available}")]
    StackUnderflow { needed: usize, available: usize },

    /// `ret` with no pending call.
    #[error("call stack underflow")]
    CallStackUnderflow,

    #[error("division by zero")]
    DivisionByZero,

    /// Result does not fit a 64-bit signed integer.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// Control transfer to a label no `mark` declares.
    #[error("unresolved label {0}")]
    UnresolvedLabel(Label),

    /// Ran past the last instruction without `exit`.
    #[error("unexpected end of program")]
    UnexpectedEndOfProgram,

    /// Input could not be read under the strict input policy.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(Arc<io::Error>),

    /// Step budget imposed by the host ran out.
    #[error("runtime execution limit of {0} steps exceeded")]
    ExecFuelExhausted(u64),
}

impl From<io::Error> for RuntimeError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

/// Absent or malformed input for `inc`/`inn`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("end of input")]
    EndOfInput,

    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

/// A runtime error together with where it happened.
///
/// `ip` is the index of the faulting instruction. For
/// [`RuntimeError::UnexpectedEndOfProgram`] it equals the program length
/// and `instruction` is `None`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error} at instruction {ip}{}", .instruction.map(|i| format!(" ({})", i.opcode())).unwrap_or_default())]
pub struct Fault {
    pub ip: usize,
    pub instruction: Option<Instruction>,
    #[source]
    pub error: RuntimeError,
}

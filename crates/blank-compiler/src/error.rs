//! Errors produced while decoding source.

use blank_bytecode::Opcode;

/// Lexical error. Offsets point into the original source bytes, comments
/// included, at the first byte of the offending codeword.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// No codeword starts with these characters.
    #[error("unknown codeword {codeword} at byte {offset}")]
    UnknownCodeword { offset: usize, codeword: String },

    /// Source ended in the middle of a codeword.
    #[error("truncated codeword {codeword} at byte {offset}")]
    TruncatedCodeword { offset: usize, codeword: String },

    /// Source ended before the line feed closing an argument.
    #[error("unterminated {opcode} argument at byte {offset}")]
    UnterminatedArgument { offset: usize, opcode: Opcode },

    /// Argument magnitude does not fit the 64-bit operand.
    #[error("{opcode} argument out of range at byte {offset}")]
    ArgumentOverflow { offset: usize, opcode: Opcode },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            Self::UnknownCodeword { offset, .. }
            | Self::TruncatedCodeword { offset, .. }
            | Self::UnterminatedArgument { offset, .. }
            | Self::ArgumentOverflow { offset, .. } => *offset,
        }
    }
}

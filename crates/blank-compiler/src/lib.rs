//! Front end for blank: turns raw source bytes into a [`Program`].
//!
//! Only space, tab and line feed carry meaning. Every other byte is
//! commentary and is dropped before codewords are recognized, so comments
//! may appear anywhere, even inside a codeword or an argument.

pub mod error;
pub mod lexer;


use blank_bytecode::Program;

pub use error::LexError;
pub use lexer::{LexerConfig, lex};

/// Lex `source` and build the program with its label map.
pub fn compile(source: &[u8], config: &LexerConfig) -> Result<Program, LexError> {
    let instructions = lex(source, config)?;
    tracing::debug!(
        bytes = source.len(),
        instructions = instructions.len(),
        lenient = config.is_lenient(),
        "source decoded"
    );
    Ok(Program::new(instructions))
}

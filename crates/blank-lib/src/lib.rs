//! blank: an interpreter for whitespace programs.
//!
//! # Example
//!
//! ```
//! use blank_lib::{LoadOptions, RunOptions};
//!
//! // push 1, outn, exit, with commentary in between
//! let source = b"push   \t\noutn\t\n \texit\n\n\n";
//! let program = blank_lib::load(source, &LoadOptions::default()).unwrap();
//!
//! let mut output = Vec::new();
//! blank_lib::run(&program, &b""[..], &mut output, &RunOptions::default()).unwrap();
//! assert_eq!(output, b"1");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod loader;


pub use blank_bytecode::{Instruction, Label, Opcode, Program, dump};
pub use blank_compiler::{LexError, LexerConfig};
pub use blank_core::Colors;
pub use blank_vm::{
    Fault, FuelLimits, Halt, InputError, InputPolicy, NoopTracer, PrintTracer, RuntimeError,
    State, Tracer, VM, Verbosity,
};
pub use loader::{LoadError, LoadOptions, RunOptions, load, run};

/// Anything that stops a program from loading or running to `exit`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Runtime(#[from] Fault),
}

impl Error {
    /// Process exit status for this error: 1 for load failures, 2 for faults.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Load(_) => 1,
            Self::Runtime(_) => 2,
        }
    }
}

/// Result type for load-and-run operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Load `source` and run it to completion.
pub fn execute<R, W>(
    source: &[u8],
    input: R,
    output: W,
    load_options: &LoadOptions,
    run_options: &RunOptions,
) -> Result<Halt>
where
    R: std::io::BufRead,
    W: std::io::Write,
{
    let program = load(source, load_options)?;
    Ok(run(&program, input, output, run_options)?)
}

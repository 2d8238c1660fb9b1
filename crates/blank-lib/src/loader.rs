//! Loading source into a checked program and running it.

use std::io::{BufRead, Write};

use blank_bytecode::{Label, Program};
use blank_compiler::{LexError, LexerConfig, compile};
use blank_vm::{Fault, FuelLimits, Halt, InputPolicy, VM};

/// Why source could not be turned into a runnable program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A control transfer names a label no `mark` declares.
    #[error("unresolved label {label} at instruction {index}")]
    UnresolvedLabel { label: Label, index: usize },
}

/// How source is decoded and checked.
#[derive(Clone, Copy, Debug)]
pub struct LoadOptions {
    lenient: bool,
    check_labels: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            lenient: false,
            check_labels: true,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip unrecognized characters instead of failing.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Reject programs referencing undeclared labels before running.
    ///
    /// When disabled, a missing label faults only if control reaches it.
    pub fn check_labels(mut self, check: bool) -> Self {
        self.check_labels = check;
        self
    }
}

/// How a loaded program is executed.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    input_policy: InputPolicy,
    limits: FuelLimits,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_policy(mut self, policy: InputPolicy) -> Self {
        self.input_policy = policy;
        self
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Stop after `fuel` instructions.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    /// Build a VM for `program` configured with these options.
    pub fn build_vm<'p, R: BufRead, W: Write>(
        &self,
        program: &'p Program,
        input: R,
        output: W,
    ) -> VM<'p, R, W> {
        VM::builder(program, input, output)
            .input_policy(self.input_policy)
            .limits(self.limits)
            .build()
    }
}

/// Decode `source` into a program, checking labels if requested.
pub fn load(source: &[u8], options: &LoadOptions) -> Result<Program, LoadError> {
    let config = LexerConfig::new().lenient(options.lenient);
    let program = compile(source, &config)?;

    if options.check_labels
        && let Some(unresolved) = program.unresolved_labels().into_iter().next()
    {
        tracing::debug!(label = %unresolved.label, index = unresolved.index, "unresolved label");
        return Err(LoadError::UnresolvedLabel {
            label: unresolved.label,
            index: unresolved.index,
        });
    }

    tracing::debug!(
        instructions = program.len(),
        labels = program.labels().count(),
        "program loaded"
    );
    Ok(program)
}

/// Run `program` until `exit` or a fault.
pub fn run<R: BufRead, W: Write>(
    program: &Program,
    input: R,
    output: W,
    options: &RunOptions,
) -> Result<Halt, Fault> {
    options.build_vm(program, input, output).execute()
}

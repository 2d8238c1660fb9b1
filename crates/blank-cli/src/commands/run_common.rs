//! Shared logic for the run, dump and trace commands.

use std::fs;
use std::io::{self, BufWriter, Read, StdinLock, StdoutLock};
use std::path::PathBuf;

use blank_lib::{Fault, FuelLimits, InputPolicy, LoadOptions, Program, RunOptions};

/// Read and concatenate source files in order. No files, or `-`, reads stdin.
pub fn read_sources(paths: &[PathBuf]) -> Result<Vec<u8>, SourceError> {
    let mut source = Vec::new();
    if paths.is_empty() {
        read_stdin(&mut source)?;
        return Ok(source);
    }

    for path in paths {
        if path.as_os_str() == "-" {
            read_stdin(&mut source)?;
            continue;
        }
        let bytes = fs::read(path).map_err(|err| SourceError::File {
            path: path.clone(),
            err,
        })?;
        source.extend_from_slice(&bytes);
    }
    Ok(source)
}

fn read_stdin(buf: &mut Vec<u8>) -> Result<(), SourceError> {
    io::stdin()
        .read_to_end(buf)
        .map(drop)
        .map_err(SourceError::Stdin)
}

/// A source that could not be read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read '{}': {err}", path.display())]
    File {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
}

/// Read and load the program, exiting with status 1 on failure.
pub fn load_program(paths: &[PathBuf], options: &LoadOptions) -> Program {
    let source = read_sources(paths).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });
    tracing::debug!(
        sources = %describe_sources(paths),
        bytes = source.len(),
        "source read"
    );

    blank_lib::load(&source, options).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    })
}

/// Execution settings shared by run and trace.
pub fn run_options(strict_input: bool, fuel: Option<u64>) -> RunOptions {
    let policy = if strict_input {
        InputPolicy::Strict
    } else {
        InputPolicy::Lenient
    };
    let limits = match fuel {
        Some(fuel) => FuelLimits::new().exec_fuel(fuel),
        None => FuelLimits::new(),
    };
    RunOptions::new().input_policy(policy).limits(limits)
}

/// Program I/O: stdin for `inc`/`inn`, buffered stdout for `outc`/`outn`.
pub fn program_io() -> (StdinLock<'static>, BufWriter<StdoutLock<'static>>) {
    (io::stdin().lock(), BufWriter::new(io::stdout().lock()))
}

/// Report a runtime fault and exit with status 2.
pub fn exit_with_fault(fault: &Fault) -> ! {
    eprintln!("runtime error: {}", fault);
    std::process::exit(2)
}

/// Display name for a set of sources in log output.
fn describe_sources(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<stdin>".to_string();
    }
    let names: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
    names.join(", ")
}

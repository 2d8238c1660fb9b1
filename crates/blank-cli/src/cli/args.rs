//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.
//! This allows the same arg definition to be reused across commands with
//! different visibility settings (via `.hide(true)`).

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Source files, concatenated in order (positional, repeatable).
pub fn files_arg() -> Arg {
    Arg::new("files")
        .value_name("FILE")
        .num_args(0..)
        .action(ArgAction::Append)
        .value_parser(value_parser!(PathBuf))
        .help("Source files, concatenated in order (stdin if none or '-')")
}

/// Skip unrecognized codewords (--lenient).
pub fn lenient_arg() -> Arg {
    Arg::new("lenient")
        .long("lenient")
        .action(ArgAction::SetTrue)
        .help("Skip unrecognized codewords instead of failing")
}

/// Defer label checks to run time (--no-check-labels).
pub fn no_check_labels_arg() -> Arg {
    Arg::new("no_check_labels")
        .long("no-check-labels")
        .action(ArgAction::SetTrue)
        .help("Allow undeclared labels unless control reaches them")
}

/// Fault on missing or malformed input (--strict-input).
pub fn strict_input_arg() -> Arg {
    Arg::new("strict_input")
        .long("strict-input")
        .action(ArgAction::SetTrue)
        .help("Fault on end of input or malformed numbers instead of storing 0")
}

/// Execution fuel limit (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .value_parser(value_parser!(u64))
        .help("Stop after N instructions")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for stack, -vv also for memory and input)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

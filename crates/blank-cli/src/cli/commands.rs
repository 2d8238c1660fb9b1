//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.
//! run/dump/trace accept each other's flags, with irrelevant ones hidden
//! from `--help`, so a command line can be switched between them by
//! changing only the subcommand.

use clap::Command;

use super::args::*;

/// Add hidden execution args (for commands that don't execute).
fn with_hidden_run_args(cmd: Command) -> Command {
    cmd.arg(no_check_labels_arg().hide(true))
        .arg(strict_input_arg().hide(true))
        .arg(fuel_arg().hide(true))
}

/// Add hidden trace args (for commands that don't trace).
fn with_hidden_trace_args(cmd: Command) -> Command {
    cmd.arg(verbose_arg().hide(true))
        .arg(color_arg().hide(true))
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("blank")
        .about("Interpreter for whitespace programs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(run_command())
        .subcommand(dump_command())
        .subcommand(trace_command())
}

/// Run a program.
pub fn run_command() -> Command {
    let cmd = Command::new("run")
        .about("Run a program")
        .override_usage(
            "\
  blank run [FILE]...
  blank run < program.ws",
        )
        .after_help(
            r#"EXAMPLES:
  blank run hello.ws                  # single file
  blank run lib.ws main.ws            # files are concatenated
  blank run loop.ws --fuel 10000      # stop after 10000 instructions

EXIT STATUS:
  0 program reached exit, 1 source failed to load, 2 runtime fault"#,
        )
        .arg(files_arg())
        .arg(lenient_arg())
        .arg(no_check_labels_arg())
        .arg(strict_input_arg())
        .arg(fuel_arg());

    with_hidden_trace_args(cmd)
}

/// Show the decoded program.
///
/// Accepts execution flags for a unified CLI experience, but ignores them.
/// Labels are never checked: unresolved targets are shown as `-> ?`.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Show the decoded program")
        .override_usage("  blank dump [FILE]...")
        .after_help(
            r#"EXAMPLES:
  blank dump hello.ws                 # labels and instructions
  blank dump noisy.ws --lenient       # skip unrecognized codewords"#,
        )
        .arg(files_arg())
        .arg(lenient_arg())
        .arg(color_arg());

    with_hidden_run_args(cmd.arg(verbose_arg().hide(true)))
}

/// Trace program execution for debugging.
pub fn trace_command() -> Command {
    Command::new("trace")
        .about("Trace program execution for debugging")
        .override_usage("  blank trace [FILE]... [-v|-vv]")
        .after_help(
            r#"EXAMPLES:
  blank trace hello.ws                # instructions and control flow
  blank trace hello.ws -v             # also the stack after each step
  blank trace hello.ws -vv            # also memory writes and input

The trace is written to stderr once execution stops; program output stays on stdout."#,
        )
        .arg(files_arg())
        .arg(lenient_arg())
        .arg(no_check_labels_arg())
        .arg(strict_input_arg())
        .arg(fuel_arg().default_value("1000000"))
        .arg(verbose_arg())
        .arg(color_arg())
}

//! Run a program against stdin and stdout.

use std::path::PathBuf;

use blank_lib::LoadOptions;

use super::run_common;

pub struct RunArgs {
    pub files: Vec<PathBuf>,
    pub lenient: bool,
    pub check_labels: bool,
    pub strict_input: bool,
    pub fuel: Option<u64>,
}

pub fn run(args: RunArgs) {
    let load_options = LoadOptions::new()
        .lenient(args.lenient)
        .check_labels(args.check_labels);
    let program = run_common::load_program(&args.files, &load_options);

    let (input, output) = run_common::program_io();
    let options = run_common::run_options(args.strict_input, args.fuel);
    if let Err(fault) = blank_lib::run(&program, input, output, &options) {
        run_common::exit_with_fault(&fault);
    }
}

//! Trace program execution for debugging.

use std::path::PathBuf;

use blank_lib::{Colors, LoadOptions, PrintTracer, Verbosity};

use super::run_common;

pub struct TraceArgs {
    pub files: Vec<PathBuf>,
    pub lenient: bool,
    pub check_labels: bool,
    pub strict_input: bool,
    pub fuel: Option<u64>,
    pub verbosity: Verbosity,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let load_options = LoadOptions::new()
        .lenient(args.lenient)
        .check_labels(args.check_labels);
    let program = run_common::load_program(&args.files, &load_options);

    let (input, output) = run_common::program_io();
    let options = run_common::run_options(args.strict_input, args.fuel);
    let mut vm = options.build_vm(&program, input, output);
    let mut tracer = PrintTracer::new(&program, args.verbosity, Colors::new(args.color));

    match vm.execute_with(&mut tracer) {
        Ok(_) => tracer.print(),
        Err(fault) => {
            tracer.print();
            run_common::exit_with_fault(&fault);
        }
    }
}

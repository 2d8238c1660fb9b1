//! Show the decoded program.

use std::path::PathBuf;

use blank_lib::{Colors, LoadOptions};

use super::run_common;

pub struct DumpArgs {
    pub files: Vec<PathBuf>,
    pub lenient: bool,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    // Unresolved labels are part of what a dump shows.
    let load_options = LoadOptions::new()
        .lenient(args.lenient)
        .check_labels(false);
    let program = run_common::load_program(&args.files, &load_options);

    print!("{}", blank_lib::dump(&program, Colors::new(args.color)));
}

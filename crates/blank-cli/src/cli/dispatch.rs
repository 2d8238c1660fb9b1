//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs that mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors that pull relevant fields (ignoring hidden ones)
//! - `Into<*Args>` impls to bridge dispatch → command handlers

use std::io::IsTerminal;
use std::path::PathBuf;

use blank_lib::Verbosity;
use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::dump::DumpArgs;
use crate::commands::run::RunArgs;
use crate::commands::trace::TraceArgs;

pub struct RunParams {
    pub files: Vec<PathBuf>,
    pub lenient: bool,
    pub check_labels: bool,
    pub strict_input: bool,
    pub fuel: Option<u64>,
    // Note: verbose and color are parsed but not extracted (unified flags)
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            files: parse_files(m),
            lenient: m.get_flag("lenient"),
            check_labels: !m.get_flag("no_check_labels"),
            strict_input: m.get_flag("strict_input"),
            fuel: m.get_one::<u64>("fuel").copied(),
        }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self {
            files: p.files,
            lenient: p.lenient,
            check_labels: p.check_labels,
            strict_input: p.strict_input,
            fuel: p.fuel,
        }
    }
}

pub struct DumpParams {
    pub files: Vec<PathBuf>,
    pub lenient: bool,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            files: parse_files(m),
            lenient: m.get_flag("lenient"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            files: p.files,
            lenient: p.lenient,
            color: p.color.should_colorize(std::io::stdout().is_terminal()),
        }
    }
}

pub struct TraceParams {
    pub files: Vec<PathBuf>,
    pub lenient: bool,
    pub check_labels: bool,
    pub strict_input: bool,
    pub fuel: Option<u64>,
    pub verbosity: Verbosity,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            files: parse_files(m),
            lenient: m.get_flag("lenient"),
            check_labels: !m.get_flag("no_check_labels"),
            strict_input: m.get_flag("strict_input"),
            fuel: m.get_one::<u64>("fuel").copied(),
            verbosity: parse_verbosity(m),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        Self {
            files: p.files,
            lenient: p.lenient,
            check_labels: p.check_labels,
            strict_input: p.strict_input,
            fuel: p.fuel,
            verbosity: p.verbosity,
            color: p.color.should_colorize(std::io::stderr().is_terminal()),
        }
    }
}

fn parse_files(m: &ArgMatches) -> Vec<PathBuf> {
    m.get_many::<PathBuf>("files")
        .map(|files| files.cloned().collect())
        .unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_verbosity(m: &ArgMatches) -> Verbosity {
    match m.get_count("verbose") {
        0 => Verbosity::Default,
        1 => Verbosity::Verbose,
        _ => Verbosity::VeryVerbose,
    }
}

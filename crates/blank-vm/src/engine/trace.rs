//! Tracing infrastructure for debugging VM execution.
//!
//! # Design: Zero-Cost Abstraction
//!
//! When `NoopTracer` is used every hook is an `#[inline(always)]` empty
//! function, so the compiler removes the calls and their arguments from
//! the dispatch loop. No tracing state lives in the VM itself.
//!
//! `PrintTracer` collects a listing in the same column layout as the
//! program dump: one line per executed instruction, control transfers
//! annotated at the note column, and optional sub-lines for the stack,
//! memory writes and input.

use blank_bytecode::dump::cols;
use blank_bytecode::{Instruction, Program, format_instruction};
use blank_core::Colors;
use blank_core::utils::{pad_to, width_for_count};

use super::error::Fault;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Default: instructions, control transfers, halt or fault.
    #[default]
    Default,
    /// Verbose (-v): also the stack after each step.
    Verbose,
    /// Very verbose (-vv): also memory writes and input.
    VeryVerbose,
}

/// Tracer trait for VM execution instrumentation.
///
/// Each method is called at a specific point during execution:
/// - `trace_instruction` - after fetch, before dispatch
/// - `trace_jump` - when `jump`, `jz` or `jn` transfers control
/// - `trace_call` / `trace_return` - on subroutine entry and exit
/// - `trace_store` - after `store` writes memory
/// - `trace_input` - after `inc`/`inn` store what they read
/// - `trace_stack` - after a step that leaves the machine running
/// - `trace_halt` / `trace_fault` - once, at the terminal state
pub trait Tracer {
    fn trace_instruction(&mut self, ip: usize, instr: &Instruction);

    fn trace_stack(&mut self, stack: &[i64]);

    fn trace_jump(&mut self, from: usize, to: usize);

    /// `depth` is the call depth after entering the subroutine.
    fn trace_call(&mut self, ip: usize, target: usize, depth: usize);

    fn trace_return(&mut self, ip: usize, target: usize);

    fn trace_store(&mut self, address: i64, value: i64);

    fn trace_input(&mut self, address: i64, value: i64);

    fn trace_halt(&mut self, steps: u64);

    fn trace_fault(&mut self, fault: &Fault);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_instruction(&mut self, _ip: usize, _instr: &Instruction) {}

    #[inline(always)]
    fn trace_stack(&mut self, _stack: &[i64]) {}

    #[inline(always)]
    fn trace_jump(&mut self, _from: usize, _to: usize) {}

    #[inline(always)]
    fn trace_call(&mut self, _ip: usize, _target: usize, _depth: usize) {}

    #[inline(always)]
    fn trace_return(&mut self, _ip: usize, _target: usize) {}

    #[inline(always)]
    fn trace_store(&mut self, _address: i64, _value: i64) {}

    #[inline(always)]
    fn trace_input(&mut self, _address: i64, _value: i64) {}

    #[inline(always)]
    fn trace_halt(&mut self, _steps: u64) {}

    #[inline(always)]
    fn trace_fault(&mut self, _fault: &Fault) {}
}

/// Tracer that collects execution trace for debugging.
pub struct PrintTracer {
    /// Verbosity level for output filtering.
    verbosity: Verbosity,
    /// Collected trace lines.
    lines: Vec<String>,
    /// Index into `lines` of the most recent instruction line.
    current: Option<usize>,
    /// Instruction index width for formatting.
    ip_width: usize,
    /// Color palette.
    colors: Colors,
}

impl PrintTracer {
    pub fn new(program: &Program, verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
            current: None,
            ip_width: width_for_count(program.len()),
            colors,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All trace lines joined with trailing newlines.
    pub fn into_string(self) -> String {
        let mut out = String::new();
        for line in self.lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Print all trace lines to stderr.
    pub fn print(&self) {
        for line in &self.lines {
            eprintln!("{line}");
        }
    }

    /// Append an annotation at the note column of the current instruction line.
    fn annotate(&mut self, note: String) {
        let Some(line) = self.current.and_then(|i| self.lines.get_mut(i)) else {
            return;
        };
        *line = format!("{}{note}", pad_to(line.as_str(), cols::NOTE));
    }

    /// Add a sub-line aligned with the instruction text.
    fn add_subline(&mut self, content: String) {
        let indent = cols::INDENT + self.ip_width + cols::GAP;
        let c = self.colors;
        self.lines
            .push(format!("{:indent$}{}", "", c.paint(c.muted, content)));
    }
}

impl Tracer for PrintTracer {
    fn trace_instruction(&mut self, ip: usize, instr: &Instruction) {
        let c = self.colors;
        let line = format!(
            "{:indent$}{}{:gap$}{}",
            "",
            c.paint(c.muted, format_args!("{ip:0width$}", width = self.ip_width)),
            "",
            format_instruction(instr, c),
            indent = cols::INDENT,
            gap = cols::GAP,
        );
        self.current = Some(self.lines.len());
        self.lines.push(line);
    }

    fn trace_stack(&mut self, stack: &[i64]) {
        if self.verbosity < Verbosity::Verbose {
            return;
        }
        self.add_subline(format!("stack {stack:?}"));
    }

    fn trace_jump(&mut self, _from: usize, to: usize) {
        let c = self.colors;
        self.annotate(c.paint(c.muted, format_args!("-> {to}")));
    }

    fn trace_call(&mut self, _ip: usize, target: usize, depth: usize) {
        let c = self.colors;
        self.annotate(c.paint(c.muted, format_args!("-> {target} (depth {depth})")));
    }

    fn trace_return(&mut self, _ip: usize, target: usize) {
        let c = self.colors;
        self.annotate(c.paint(c.muted, format_args!("<- {target}")));
    }

    fn trace_store(&mut self, address: i64, value: i64) {
        if self.verbosity < Verbosity::VeryVerbose {
            return;
        }
        self.add_subline(format!("mem[{address}] = {value}"));
    }

    fn trace_input(&mut self, address: i64, value: i64) {
        if self.verbosity < Verbosity::VeryVerbose {
            return;
        }
        self.add_subline(format!("input mem[{address}] = {value}"));
    }

    fn trace_halt(&mut self, steps: u64) {
        let c = self.colors;
        self.current = None;
        self.lines
            .push(c.paint(c.ok, format_args!("halted after {steps} steps")));
    }

    fn trace_fault(&mut self, fault: &Fault) {
        let c = self.colors;
        self.current = None;
        self.lines.push(c.paint(c.error, format_args!("fault: {fault}")));
    }
}

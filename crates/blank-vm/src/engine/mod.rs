//! Runtime engine for executing blank programs.
//!
//! The VM owns the operand stack, call stack and memory, and performs all
//! I/O through the reader and writer it was built with.

mod error;
mod frame;
mod io;
mod memory;
mod stack;
mod trace;
mod vm;

#[cfg(test)]
mod engine_tests;

pub use error::{Fault, InputError, RuntimeError};
pub use frame::CallStack;
pub use io::InputPolicy;
pub use memory::Memory;
pub use stack::OperandStack;
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use vm::{FuelLimits, Halt, State, VM, VMBuilder};

//! Runtime VM for executing blank programs.
//!
//! This crate provides the stack machine that runs a decoded
//! [`Program`](blank_bytecode::Program) against byte-oriented input and
//! output streams.

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{
    CallStack, Fault, FuelLimits, Halt, InputError, InputPolicy, Memory, NoopTracer,
    OperandStack, PrintTracer, RuntimeError, State, Tracer, VM, VMBuilder, Verbosity,
};

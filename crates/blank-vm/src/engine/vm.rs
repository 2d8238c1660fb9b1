//! Virtual machine for executing blank programs.

use std::io::{BufRead, Write};

use blank_bytecode::{Instruction, Label, Program};

use super::error::{Fault, RuntimeError};
use super::frame::CallStack;
use super::io::{InputPolicy, read_byte, read_number};
use super::memory::Memory;
use super::stack::OperandStack;
use super::trace::{NoopTracer, Tracer};

/// Runtime limits imposed by the host.
///
/// The default is unlimited: a program that loops forever runs forever.
#[derive(Clone, Copy, Debug, Default)]
pub struct FuelLimits {
    /// Maximum number of executed instructions.
    pub(crate) exec_fuel: Option<u64>,
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.exec_fuel = Some(fuel);
        self
    }

    pub fn get_exec_fuel(&self) -> Option<u64> {
        self.exec_fuel
    }
}

/// Machine state between steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    /// `exit` executed.
    Halted,
    Faulted,
}

/// Successful termination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Halt {
    /// Number of instructions executed, `exit` included.
    pub steps: u64,
}

/// Virtual machine state for program execution.
pub struct VM<'p, R, W> {
    program: &'p Program,
    /// Index of the next instruction to fetch.
    pc: usize,
    stack: OperandStack,
    calls: CallStack,
    memory: Memory,
    input: R,
    output: W,
    input_policy: InputPolicy,
    state: State,
    fault: Option<Fault>,
    steps: u64,
    limits: FuelLimits,
}

/// Builder for VM instances.
pub struct VMBuilder<'p, R, W> {
    program: &'p Program,
    input: R,
    output: W,
    input_policy: InputPolicy,
    limits: FuelLimits,
}

impl<'p, R: BufRead, W: Write> VMBuilder<'p, R, W> {
    /// Create a new VM builder.
    pub fn new(program: &'p Program, input: R, output: W) -> Self {
        Self {
            program,
            input,
            output,
            input_policy: InputPolicy::default(),
            limits: FuelLimits::default(),
        }
    }

    /// Set how `inc`/`inn` treat missing or malformed input.
    pub fn input_policy(mut self, policy: InputPolicy) -> Self {
        self.input_policy = policy;
        self
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u64) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    /// Build the VM.
    pub fn build(self) -> VM<'p, R, W> {
        VM {
            program: self.program,
            pc: 0,
            stack: OperandStack::new(),
            calls: CallStack::new(),
            memory: Memory::new(),
            input: self.input,
            output: self.output,
            input_policy: self.input_policy,
            state: State::Running,
            fault: None,
            steps: 0,
            limits: self.limits,
        }
    }
}

impl<'p, R: BufRead, W: Write> VM<'p, R, W> {
    /// Create a VM builder.
    pub fn builder(program: &'p Program, input: R, output: W) -> VMBuilder<'p, R, W> {
        VMBuilder::new(program, input, output)
    }

    /// Run until `exit` or a fault.
    ///
    /// This is a convenience method that uses `NoopTracer`, which gets
    /// completely optimized away at compile time.
    pub fn execute(&mut self) -> Result<Halt, Fault> {
        self.execute_with(&mut NoopTracer)
    }

    /// Run with a tracer for debugging.
    pub fn execute_with<T: Tracer>(&mut self, tracer: &mut T) -> Result<Halt, Fault> {
        tracing::debug!(
            instructions = self.program.len(),
            fuel = ?self.limits.exec_fuel,
            "execution started"
        );

        loop {
            match self.step_with(tracer) {
                Ok(State::Running) => {}
                Ok(_) => break,
                Err(fault) => {
                    tracing::debug!(%fault, steps = self.steps, "execution faulted");
                    return Err(fault);
                }
            }
        }

        tracing::debug!(steps = self.steps, "execution halted");
        Ok(Halt { steps: self.steps })
    }

    /// Execute a single instruction.
    ///
    /// Once the machine has halted this does nothing and returns
    /// [`State::Halted`]; once it has faulted it returns the same fault again.
    pub fn step(&mut self) -> Result<State, Fault> {
        self.step_with(&mut NoopTracer)
    }

    /// Execute a single instruction, reporting to `tracer`.
    pub fn step_with<T: Tracer>(&mut self, tracer: &mut T) -> Result<State, Fault> {
        match self.state {
            State::Running => {}
            State::Halted => return Ok(State::Halted),
            State::Faulted => {
                if let Some(fault) = &self.fault {
                    return Err(fault.clone());
                }
            }
        }

        let ip = self.pc;
        match self.fetch_and_dispatch(ip, tracer) {
            Ok(State::Running) => {
                tracer.trace_stack(self.stack.as_slice());
                Ok(State::Running)
            }
            Ok(state) => {
                self.state = state;
                tracer.trace_halt(self.steps);
                Ok(state)
            }
            Err(error) => {
                // Output produced before the fault stays observable.
                if let Err(err) = self.output.flush() {
                    tracing::warn!(%err, "failed to flush output after fault");
                }
                let fault = Fault {
                    ip,
                    instruction: self.program.get(ip).copied(),
                    error,
                };
                self.state = State::Faulted;
                self.fault = Some(fault.clone());
                tracer.trace_fault(&fault);
                Err(fault)
            }
        }
    }

    /// Index of the next instruction to execute.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Operand stack, bottom first.
    pub fn stack(&self) -> &[i64] {
        self.stack.as_slice()
    }

    /// Pending return addresses, outermost first.
    pub fn call_stack(&self) -> &[usize] {
        self.calls.as_slice()
    }

    /// Value at `address`; unwritten cells read as 0.
    pub fn memory_at(&self, address: i64) -> i64 {
        self.memory.load(address)
    }

    /// The fault that stopped the machine, if any.
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Consume the VM, returning its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn fetch_and_dispatch<T: Tracer>(
        &mut self,
        ip: usize,
        tracer: &mut T,
    ) -> Result<State, RuntimeError> {
        if let Some(limit) = self.limits.exec_fuel
            && self.steps >= limit
        {
            return Err(RuntimeError::ExecFuelExhausted(limit));
        }

        let instr = *self
            .program
            .get(ip)
            .ok_or(RuntimeError::UnexpectedEndOfProgram)?;
        tracer.trace_instruction(ip, &instr);

        self.steps += 1;
        self.pc = ip + 1;
        self.dispatch(ip, instr, tracer)
    }

    fn dispatch<T: Tracer>(
        &mut self,
        ip: usize,
        instr: Instruction,
        tracer: &mut T,
    ) -> Result<State, RuntimeError> {
        match instr {
            Instruction::Push(value) => self.stack.push(value),
            Instruction::Dup => self.stack.dup(),
            Instruction::Copy(n) => self.stack.copy(n)?,
            Instruction::Swap => self.stack.swap()?,
            Instruction::Discard => {
                self.stack.pop()?;
            }
            Instruction::Slide(n) => self.stack.slide(n)?,

            Instruction::Add => self.arithmetic(i64::checked_add)?,
            Instruction::Sub => self.arithmetic(i64::checked_sub)?,
            Instruction::Mul => self.arithmetic(i64::checked_mul)?,
            Instruction::Div => self.division(i64::checked_div)?,
            Instruction::Mod => self.division(i64::checked_rem)?,

            Instruction::Store => {
                let (address, value) = self.stack.pop_pair()?;
                self.memory.store(address, value);
                tracer.trace_store(address, value);
            }
            Instruction::Retrieve => {
                let address = self.stack.pop()?;
                self.stack.push(self.memory.load(address));
            }

            Instruction::Mark(_) => {}
            Instruction::Call(label) => {
                let target = self.resolve(label)?;
                self.calls.push(self.pc);
                tracer.trace_call(ip, target, self.calls.depth());
                self.pc = target;
            }
            Instruction::Jump(label) => self.jump(ip, label, tracer)?,
            Instruction::Jz(label) => {
                if self.stack.pop()? == 0 {
                    self.jump(ip, label, tracer)?;
                }
            }
            Instruction::Jn(label) => {
                if self.stack.pop()? < 0 {
                    self.jump(ip, label, tracer)?;
                }
            }
            Instruction::Ret => {
                let target = self.calls.pop().ok_or(RuntimeError::CallStackUnderflow)?;
                tracer.trace_return(ip, target);
                self.pc = target;
            }
            Instruction::Exit => {
                self.output.flush()?;
                return Ok(State::Halted);
            }

            Instruction::OutC => {
                let value = self.stack.pop()?;
                let ch = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                let mut buf = [0; 4];
                self.output.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            }
            Instruction::OutN => {
                let value = self.stack.pop()?;
                write!(self.output, "{value}")?;
            }
            Instruction::InC => {
                let address = self.stack.pop()?;
                self.output.flush()?;
                let value = self.input_policy.resolve(read_byte(&mut self.input)?)?;
                self.memory.store(address, value);
                tracer.trace_input(address, value);
            }
            Instruction::InN => {
                let address = self.stack.pop()?;
                self.output.flush()?;
                let value = self.input_policy.resolve(read_number(&mut self.input)?)?;
                self.memory.store(address, value);
                tracer.trace_input(address, value);
            }
        }
        Ok(State::Running)
    }

    /// Pop `rhs`, pop `lhs`, push `op(lhs, rhs)`.
    fn arithmetic(&mut self, op: fn(i64, i64) -> Option<i64>) -> Result<(), RuntimeError> {
        let (lhs, rhs) = self.stack.pop_pair()?;
        let result = op(lhs, rhs).ok_or(RuntimeError::ArithmeticOverflow)?;
        self.stack.push(result);
        Ok(())
    }

    /// Like [`Self::arithmetic`], with a zero divisor reported before overflow.
    fn division(&mut self, op: fn(i64, i64) -> Option<i64>) -> Result<(), RuntimeError> {
        let (lhs, rhs) = self.stack.pop_pair()?;
        if rhs == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        let result = op(lhs, rhs).ok_or(RuntimeError::ArithmeticOverflow)?;
        self.stack.push(result);
        Ok(())
    }

    fn resolve(&self, label: Label) -> Result<usize, RuntimeError> {
        self.program
            .resolve(label)
            .ok_or(RuntimeError::UnresolvedLabel(label))
    }

    fn jump<T: Tracer>(
        &mut self,
        ip: usize,
        label: Label,
        tracer: &mut T,
    ) -> Result<(), RuntimeError> {
        let target = self.resolve(label)?;
        tracer.trace_jump(ip, target);
        self.pc = target;
        Ok(())
    }
}

//! VM execution tests.
//!
//! Programs are built directly from instructions, run against in-memory
//! input, and checked on output, final stack, memory and fault.

use std::cell::RefCell;
use std::io::{self, BufRead, Read, Write};
use std::rc::Rc;

use blank_bytecode::{Instruction as I, Label, Program};

use super::{Fault, FuelLimits, Halt, InputError, InputPolicy, RuntimeError, State, VM};

fn l(v: u64) -> Label {
    Label::new(v)
}

/// Outcome of running a program to completion.
struct Run {
    result: Result<Halt, Fault>,
    output: String,
    stack: Vec<i64>,
    memory: Vec<(i64, i64)>,
}

impl Run {
    fn fault(&self) -> &Fault {
        match &self.result {
            Ok(halt) => panic!("expected fault, halted after {} steps", halt.steps),
            Err(fault) => fault,
        }
    }

    fn error(&self) -> &RuntimeError {
        &self.fault().error
    }
}

fn run_with(instructions: &[I], input: &[u8], policy: InputPolicy) -> Run {
    let program = Program::new(instructions.to_vec());
    let mut vm = VM::builder(&program, input, Vec::new())
        .input_policy(policy)
        .exec_fuel(10_000)
        .build();
    let result = vm.execute();
    let stack = vm.stack().to_vec();
    let memory = vm.memory().cells();
    let output = String::from_utf8(vm.into_output()).expect("output is utf-8");
    Run {
        result,
        output,
        stack,
        memory,
    }
}

fn run(instructions: &[I]) -> Run {
    run_with(instructions, b"", InputPolicy::Lenient)
}

#[test]
fn outn_prints_decimal() {
    for v in [0, 42, -17] {
        let r = run(&[I::Push(v), I::OutN, I::Exit]);
        assert_eq!(r.output, v.to_string());
        assert_eq!(r.result.unwrap(), Halt { steps: 3 });
    }
}

#[test]
fn swap_exchanges_top_two() {
    let r = run(&[I::Push(1), I::Push(2), I::Swap, I::Exit]);
    assert_eq!(r.stack, [2, 1]);
}

#[test]
fn swap_twice_is_identity() {
    let r = run(&[I::Push(1), I::Push(2), I::Swap, I::Swap, I::Exit]);
    assert_eq!(r.stack, [1, 2]);
}

#[test]
fn store_then_retrieve() {
    let r = run(&[
        I::Push(5),
        I::Push(99),
        I::Store,
        I::Push(5),
        I::Retrieve,
        I::OutN,
        I::Exit,
    ]);
    assert_eq!(r.output, "99");
    assert_eq!(r.memory, [(5, 99)]);
    assert!(r.stack.is_empty());
}

#[test]
fn unwritten_address_reads_zero() {
    let r = run(&[I::Push(-3), I::Retrieve, I::Exit]);
    assert_eq!(r.stack, [0]);
    assert!(r.memory.is_empty());
}

#[test]
fn sub_takes_lhs_below_rhs() {
    let r = run(&[I::Push(7), I::Push(3), I::Sub, I::OutN, I::Exit]);
    assert_eq!(r.output, "4");
    assert!(r.result.is_ok());
}

#[test]
fn add_and_mul() {
    let r = run(&[
        I::Push(6),
        I::Push(-4),
        I::Add,
        I::Push(21),
        I::Mul,
        I::Exit,
    ]);
    assert_eq!(r.stack, [42]);
}

#[test]
fn div_and_mod_truncate_toward_zero() {
    let r = run(&[
        I::Push(-7),
        I::Push(2),
        I::Div,
        I::Push(-7),
        I::Push(2),
        I::Mod,
        I::Push(7),
        I::Push(-2),
        I::Mod,
        I::Exit,
    ]);
    assert_eq!(r.stack, [-3, -1, 1]);
}

#[test]
fn division_by_zero_faults_before_output() {
    let r = run(&[I::Push(7), I::Push(0), I::Div, I::OutN, I::Exit]);
    let fault = r.fault();
    assert!(matches!(fault.error, RuntimeError::DivisionByZero));
    assert_eq!(fault.ip, 2);
    assert_eq!(fault.instruction, Some(I::Div));
    assert_eq!(r.output, "");
    assert_eq!(
        fault.to_string(),
        "division by zero at instruction 2 (div)"
    );
}

#[test]
fn modulo_by_zero_faults() {
    let r = run(&[I::Push(7), I::Push(0), I::Mod]);
    assert!(matches!(r.error(), RuntimeError::DivisionByZero));
}

#[test]
fn arithmetic_overflow_faults() {
    let cases = [
        [I::Push(i64::MAX), I::Push(1), I::Add],
        [I::Push(i64::MIN), I::Push(1), I::Sub],
        [I::Push(i64::MAX), I::Push(2), I::Mul],
        [I::Push(i64::MIN), I::Push(-1), I::Div],
        [I::Push(i64::MIN), I::Push(-1), I::Mod],
    ];
    for case in cases {
        let r = run(&case);
        assert!(
            matches!(r.error(), RuntimeError::ArithmeticOverflow),
            "{case:?}: {:?}",
            r.error()
        );
        assert_eq!(r.fault().ip, 2);
    }
}

#[test]
fn arithmetic_underflow_leaves_stack_intact() {
    let r = run(&[I::Push(1), I::Add]);
    assert!(matches!(
        r.error(),
        RuntimeError::StackUnderflow {
            needed: 2,
            available: 1
        }
    ));
    assert_eq!(r.stack, [1]);
}

#[test]
fn loop_runs_until_fuel_runs_out() {
    let instructions = [I::Mark(l(1)), I::Push(1), I::OutN, I::Jump(l(1))];
    assert_eq!(Program::new(instructions.to_vec()).resolve(l(1)), Some(0));

    let r = run_with_fuel(&instructions, 10);
    assert!(matches!(r.error(), RuntimeError::ExecFuelExhausted(10)));
    // Ten steps cover two full passes and the next mark/push.
    assert_eq!(r.output, "11");
    assert_eq!(r.fault().ip, 2);
    assert_eq!(r.fault().instruction, Some(I::OutN));
}

fn run_with_fuel(instructions: &[I], fuel: u64) -> Run {
    let program = Program::new(instructions.to_vec());
    let mut vm = VM::builder(&program, &b""[..], Vec::new())
        .limits(FuelLimits::new().exec_fuel(fuel))
        .build();
    let result = vm.execute();
    let stack = vm.stack().to_vec();
    let memory = vm.memory().cells();
    let output = String::from_utf8(vm.into_output()).expect("output is utf-8");
    Run {
        result,
        output,
        stack,
        memory,
    }
}

#[test]
fn fuel_is_unlimited_by_default() {
    assert_eq!(FuelLimits::default().get_exec_fuel(), None);

    // Count down from 20_000, more than the test helper's budget.
    let program = Program::new(vec![
        I::Push(20_000),
        I::Mark(l(0)),
        I::Push(1),
        I::Sub,
        I::Dup,
        I::Jz(l(1)),
        I::Jump(l(0)),
        I::Mark(l(1)),
        I::Exit,
    ]);
    let mut vm = VM::builder(&program, &b""[..], Vec::new()).build();
    let halt = vm.execute().unwrap();
    assert_eq!(halt.steps, 1 + 20_000 * 6 - 1 + 2);
    assert_eq!(vm.stack(), [0]);
}

#[test]
fn ret_without_call_underflows() {
    let r = run(&[I::Ret]);
    assert!(matches!(r.error(), RuntimeError::CallStackUnderflow));
    assert_eq!(r.fault().ip, 0);
}

#[test]
fn running_off_the_end_faults() {
    let r = run(&[I::Push(1)]);
    let fault = r.fault();
    assert!(matches!(fault.error, RuntimeError::UnexpectedEndOfProgram));
    assert_eq!(fault.ip, 1);
    assert_eq!(fault.instruction, None);
    assert_eq!(r.stack, [1]);
    assert_eq!(
        fault.to_string(),
        "unexpected end of program at instruction 1"
    );
}

#[test]
fn empty_program_faults_at_zero() {
    let r = run(&[]);
    assert!(matches!(r.error(), RuntimeError::UnexpectedEndOfProgram));
    assert_eq!(r.fault().ip, 0);
}

#[test]
fn dup_on_empty_stack_does_nothing() {
    let r = run(&[I::Dup, I::Exit]);
    assert!(r.result.is_ok());
    assert!(r.stack.is_empty());
}

#[test]
fn dup_copies_top() {
    let r = run(&[I::Push(3), I::Dup, I::Exit]);
    assert_eq!(r.stack, [3, 3]);
}

#[test]
fn copy_counts_from_top() {
    let r = run(&[
        I::Push(1),
        I::Push(2),
        I::Push(3),
        I::Copy(2),
        I::Copy(0),
        I::Exit,
    ]);
    assert_eq!(r.stack, [1, 2, 3, 1, 1]);
}

#[test]
fn copy_beyond_depth_underflows() {
    let r = run(&[I::Push(1), I::Copy(1)]);
    assert!(matches!(
        r.error(),
        RuntimeError::StackUnderflow {
            needed: 2,
            available: 1
        }
    ));

    let r = run(&[I::Copy(u64::MAX)]);
    assert!(matches!(
        r.error(),
        RuntimeError::StackUnderflow { available: 0, .. }
    ));
}

#[test]
fn slide_keeps_top() {
    let r = run(&[
        I::Push(1),
        I::Push(2),
        I::Push(3),
        I::Push(4),
        I::Slide(2),
        I::Exit,
    ]);
    assert_eq!(r.stack, [1, 4]);

    let r = run(&[I::Push(1), I::Push(2), I::Slide(0), I::Exit]);
    assert_eq!(r.stack, [1, 2]);
}

#[test]
fn slide_beyond_depth_underflows() {
    let r = run(&[I::Push(1), I::Push(2), I::Slide(2)]);
    assert!(matches!(
        r.error(),
        RuntimeError::StackUnderflow {
            needed: 3,
            available: 2
        }
    ));
    assert_eq!(r.stack, [1, 2]);
}

#[test]
fn discard_on_empty_underflows() {
    let r = run(&[I::Discard]);
    assert!(matches!(
        r.error(),
        RuntimeError::StackUnderflow {
            needed: 1,
            available: 0
        }
    ));
    assert_eq!(r.fault().instruction, Some(I::Discard));
}

#[test]
fn call_returns_past_the_call() {
    let r = run(&[
        I::Call(l(1)),
        I::Push(3),
        I::OutN,
        I::Exit,
        I::Mark(l(1)),
        I::Push(2),
        I::OutN,
        I::Ret,
    ]);
    assert_eq!(r.output, "23");
}

#[test]
fn nested_calls_unwind_in_order() {
    let r = run(&[
        I::Call(l(1)),
        I::Exit,
        I::Mark(l(1)),
        I::Call(l(2)),
        I::Push(1),
        I::OutN,
        I::Ret,
        I::Mark(l(2)),
        I::Push(2),
        I::OutN,
        I::Ret,
    ]);
    assert_eq!(r.output, "21");
}

#[test]
fn jz_jumps_only_on_zero() {
    let program = |v| {
        [
            I::Push(v),
            I::Jz(l(1)),
            I::Push(9),
            I::OutN,
            I::Exit,
            I::Mark(l(1)),
            I::Push(5),
            I::OutN,
            I::Exit,
        ]
    };
    assert_eq!(run(&program(0)).output, "5");
    assert_eq!(run(&program(1)).output, "9");
    assert_eq!(run(&program(-1)).output, "9");
}

#[test]
fn jn_jumps_only_on_negative() {
    let program = |v| {
        [
            I::Push(v),
            I::Jn(l(1)),
            I::Push(9),
            I::OutN,
            I::Exit,
            I::Mark(l(1)),
            I::Push(5),
            I::OutN,
            I::Exit,
        ]
    };
    assert_eq!(run(&program(-1)).output, "5");
    assert_eq!(run(&program(0)).output, "9");
    assert_eq!(run(&program(1)).output, "9");
}

#[test]
fn unresolved_label_faults_only_when_taken() {
    let r = run(&[I::Push(5), I::Jz(l(9)), I::Exit]);
    assert!(r.result.is_ok());

    let r = run(&[I::Push(0), I::Jz(l(9))]);
    assert!(matches!(r.error(), RuntimeError::UnresolvedLabel(label) if *label == l(9)));
    assert_eq!(r.fault().ip, 1);
    // The operand is consumed before the label is looked up.
    assert!(r.stack.is_empty());

    let r = run(&[I::Call(l(4))]);
    assert!(matches!(r.error(), RuntimeError::UnresolvedLabel(_)));
}

#[test]
fn later_mark_wins() {
    let r = run(&[
        I::Jump(l(1)),
        I::Mark(l(1)),
        I::Push(1),
        I::OutN,
        I::Exit,
        I::Mark(l(1)),
        I::Push(2),
        I::OutN,
        I::Exit,
    ]);
    assert_eq!(r.output, "2");
}

#[test]
fn outc_writes_utf8_or_replacement() {
    let r = run(&[
        I::Push(72),
        I::OutC,
        I::Push(0x263A),
        I::OutC,
        I::Push(-1),
        I::OutC,
        I::Push(0xD800),
        I::OutC,
        I::Push(0x11_0000),
        I::OutC,
        I::Exit,
    ]);
    assert_eq!(r.output, "H\u{263A}\u{FFFD}\u{FFFD}\u{FFFD}");
}

#[test]
fn inc_reads_bytes() {
    let r = run_with(
        &[
            I::Push(0),
            I::InC,
            I::Push(1),
            I::InC,
            I::Exit,
        ],
        b"A\xff",
        InputPolicy::Strict,
    );
    assert_eq!(r.memory, [(0, 65), (1, 255)]);
}

#[test]
fn inc_at_end_of_input() {
    let program = [I::Push(4), I::Push(7), I::Store, I::Push(4), I::InC, I::Exit];

    let r = run_with(&program, b"", InputPolicy::Lenient);
    assert!(r.result.is_ok());
    assert_eq!(r.memory, [(4, 0)]);

    let r = run_with(&program, b"", InputPolicy::Strict);
    assert!(matches!(r.error(), RuntimeError::Input(InputError::EndOfInput)));
    assert_eq!(r.fault().ip, 4);
    assert_eq!(r.memory, [(4, 7)]);
}

#[test]
fn inn_reads_one_line_each() {
    let r = run_with(
        &[
            I::Push(0),
            I::InN,
            I::Push(1),
            I::InN,
            I::Push(2),
            I::InN,
            I::Exit,
        ],
        b"12\r\n-5\n+3",
        InputPolicy::Strict,
    );
    assert!(r.result.is_ok());
    assert_eq!(r.memory, [(0, 12), (1, -5), (2, 3)]);
}

#[test]
fn inn_with_malformed_number() {
    let program = [I::Push(0), I::InN, I::Push(1), I::InN, I::Exit];

    let r = run_with(&program, b"abc\n7\n", InputPolicy::Lenient);
    assert_eq!(r.memory, [(0, 0), (1, 7)]);

    let r = run_with(&program, b"abc\n7\n", InputPolicy::Strict);
    assert!(
        matches!(r.error(), RuntimeError::Input(InputError::InvalidNumber(text)) if text == "abc")
    );

    let r = run_with(&program, b" 1\n", InputPolicy::Strict);
    assert!(matches!(
        r.error(),
        RuntimeError::Input(InputError::InvalidNumber(_))
    ));
}

#[test]
fn inn_at_end_of_input() {
    let program = [I::Push(0), I::InN, I::Exit];

    let r = run_with(&program, b"", InputPolicy::Lenient);
    assert_eq!(r.memory, [(0, 0)]);

    let r = run_with(&program, b"", InputPolicy::Strict);
    assert!(matches!(r.error(), RuntimeError::Input(InputError::EndOfInput)));
    assert_eq!(r.fault().to_string(), "input error: end of input at instruction 1 (inn)");
}

/// Sink that only exposes bytes once flushed.
struct Buffered {
    pending: Vec<u8>,
    visible: Rc<RefCell<Vec<u8>>>,
}

impl Write for Buffered {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.visible.borrow_mut().append(&mut self.pending);
        Ok(())
    }
}

/// Source that records what output was visible whenever it is asked for data.
struct Prompted {
    data: &'static [u8],
    visible: Rc<RefCell<Vec<u8>>>,
    seen: Rc<RefCell<Vec<String>>>,
}

impl Read for Prompted {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl BufRead for Prompted {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        let visible = String::from_utf8_lossy(&self.visible.borrow()).into_owned();
        self.seen.borrow_mut().push(visible);
        Ok(self.data)
    }

    fn consume(&mut self, amt: usize) {
        self.data = &self.data[amt..];
    }
}

#[test]
fn output_is_flushed_before_each_read() {
    let visible = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let input = Prompted {
        data: b"5\nZ",
        visible: Rc::clone(&visible),
        seen: Rc::clone(&seen),
    };
    let output = Buffered {
        pending: Vec::new(),
        visible: Rc::clone(&visible),
    };

    let program = Program::new(vec![
        I::Push(63),
        I::OutC,
        I::Push(0),
        I::InN,
        I::Push(0),
        I::Retrieve,
        I::OutN,
        I::Push(63),
        I::OutC,
        I::Push(1),
        I::InC,
        I::Push(1),
        I::Retrieve,
        I::OutC,
        I::Exit,
    ]);
    let mut vm = VM::builder(&program, input, output).build();
    vm.execute().unwrap();

    assert_eq!(*seen.borrow(), ["?", "?5?"]);
    assert_eq!(*visible.borrow(), b"?5?Z");
}

#[test]
fn step_drives_the_machine() {
    let program = Program::new(vec![I::Push(2), I::Push(3), I::Mul, I::Exit]);
    let mut vm = VM::builder(&program, &b""[..], Vec::new()).build();

    assert_eq!(vm.step().unwrap(), State::Running);
    assert_eq!(vm.stack(), [2]);
    assert_eq!(vm.pc(), 1);
    assert_eq!(vm.step().unwrap(), State::Running);
    assert_eq!(vm.step().unwrap(), State::Running);
    assert_eq!(vm.stack(), [6]);
    assert_eq!(vm.step().unwrap(), State::Halted);
    assert_eq!(vm.state(), State::Halted);
    assert_eq!(vm.steps(), 4);

    // Halted is terminal.
    assert_eq!(vm.step().unwrap(), State::Halted);
    assert_eq!(vm.steps(), 4);
}

#[test]
fn call_stack_is_observable() {
    let program = Program::new(vec![I::Call(l(0)), I::Exit, I::Mark(l(0)), I::Ret]);
    let mut vm = VM::builder(&program, &b""[..], Vec::new()).build();

    vm.step().unwrap();
    assert_eq!(vm.call_stack(), [1]);
    assert_eq!(vm.pc(), 2);
    vm.step().unwrap();
    vm.step().unwrap();
    assert!(vm.call_stack().is_empty());
    assert_eq!(vm.pc(), 1);
}

#[test]
fn fault_is_terminal() {
    let program = Program::new(vec![I::Push(1), I::Ret]);
    let mut vm = VM::builder(&program, &b""[..], Vec::new()).build();

    let fault = vm.execute().unwrap_err();
    assert_eq!(fault.ip, 1);
    assert_eq!(vm.state(), State::Faulted);
    assert!(vm.fault().is_some());

    let again = vm.step().unwrap_err();
    assert_eq!(again.ip, 1);
    assert!(matches!(again.error, RuntimeError::CallStackUnderflow));
    assert_eq!(vm.steps(), 2);
}

#[test]
fn memory_at_reads_cells() {
    let program = Program::new(vec![I::Push(-8), I::Push(3), I::Store, I::Exit]);
    let mut vm = VM::builder(&program, &b""[..], Vec::new()).build();
    vm.execute().unwrap();
    assert_eq!(vm.memory_at(-8), 3);
    assert_eq!(vm.memory_at(0), 0);
}

/// Sink whose every write fails.
struct Broken;

impl Write for Broken {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failure_is_io_fault() {
    let program = Program::new(vec![I::Push(1), I::OutN, I::Exit]);
    let mut vm = VM::builder(&program, &b""[..], Broken).build();
    let fault = vm.execute().unwrap_err();
    assert_eq!(fault.ip, 1);
    assert!(
        matches!(&fault.error, RuntimeError::Io(err) if err.kind() == io::ErrorKind::BrokenPipe)
    );
}

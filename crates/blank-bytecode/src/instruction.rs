//! Instruction definitions.
//!
//! `Opcode` is the argument-free tag, `Instruction` is the decoded form with
//! its argument. Both are closed enums: every consumer matches them
//! exhaustively, so adding an opcode is checked at compile time.

use std::fmt;

/// One significant source character.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Ws {
    /// Space (0x20), written `S`.
    Space,
    /// Tab (0x09), written `T`.
    Tab,
    /// Line feed (0x0A), written `N`.
    Lf,
}

impl Ws {
    /// Classify a source byte. Everything else is commentary.
    #[inline]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b' ' => Some(Self::Space),
            b'\t' => Some(Self::Tab),
            b'\n' => Some(Self::Lf),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Space => b' ',
            Self::Tab => b'\t',
            Self::Lf => b'\n',
        }
    }

    /// Binary digit value (`S` = 0, `T` = 1); `None` for the terminator.
    #[inline]
    pub fn bit(self) -> Option<u64> {
        match self {
            Self::Space => Some(0),
            Self::Tab => Some(1),
            Self::Lf => None,
        }
    }

    /// Single-letter name used in diagnostics.
    pub fn letter(self) -> char {
        match self {
            Self::Space => 'S',
            Self::Tab => 'T',
            Self::Lf => 'N',
        }
    }
}

/// Jump target declared by `Mark` and referenced by `Call`/`Jump`/`Jz`/`Jn`.
///
/// Labels are plain unsigned integers; leading zero digits in the source
/// do not change the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Label(u64);

impl Label {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Label {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Instruction opcodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Opcode {
    Push,
    Dup,
    Copy,
    Swap,
    Discard,
    Slide,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Store,
    Retrieve,
    Mark,
    Call,
    Jump,
    Jz,
    Jn,
    Ret,
    Exit,
    OutC,
    OutN,
    InC,
    InN,
}

impl Opcode {
    pub const ALL: [Opcode; 24] = [
        Self::Push,
        Self::Dup,
        Self::Copy,
        Self::Swap,
        Self::Discard,
        Self::Slide,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Store,
        Self::Retrieve,
        Self::Mark,
        Self::Call,
        Self::Jump,
        Self::Jz,
        Self::Jn,
        Self::Ret,
        Self::Exit,
        Self::OutC,
        Self::OutN,
        Self::InC,
        Self::InN,
    ];

    /// The whitespace codeword identifying this opcode.
    pub fn codeword(self) -> &'static [Ws] {
        use Ws::{Lf as N, Space as S, Tab as T};
        match self {
            Self::Push => &[S, S],
            Self::Dup => &[S, N, S],
            Self::Swap => &[S, N, T],
            Self::Discard => &[S, N, N],
            Self::Copy => &[S, T, S],
            Self::Slide => &[S, T, N],
            Self::Add => &[T, S, S, S],
            Self::Sub => &[T, S, S, T],
            Self::Mul => &[T, S, S, N],
            Self::Div => &[T, S, T, S],
            Self::Mod => &[T, S, T, T],
            Self::Store => &[T, T, S],
            Self::Retrieve => &[T, T, T],
            Self::Mark => &[N, S, S],
            Self::Call => &[N, S, T],
            Self::Jump => &[N, S, N],
            Self::Jz => &[N, T, S],
            Self::Jn => &[N, T, T],
            Self::Ret => &[N, T, N],
            Self::Exit => &[N, N, N],
            Self::OutC => &[T, N, S, S],
            Self::OutN => &[T, N, S, T],
            Self::InC => &[T, N, T, S],
            Self::InN => &[T, N, T, T],
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Dup => "dup",
            Self::Copy => "copy",
            Self::Swap => "swap",
            Self::Discard => "discard",
            Self::Slide => "slide",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Store => "store",
            Self::Retrieve => "retrieve",
            Self::Mark => "mark",
            Self::Call => "call",
            Self::Jump => "jump",
            Self::Jz => "jz",
            Self::Jn => "jn",
            Self::Ret => "ret",
            Self::Exit => "exit",
            Self::OutC => "outc",
            Self::OutN => "outn",
            Self::InC => "inc",
            Self::InN => "inn",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A decoded instruction. Immutable once produced by the lexer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Instruction {
    Push(i64),
    Dup,
    Copy(u64),
    Swap,
    Discard,
    Slide(u64),
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Store,
    Retrieve,
    Mark(Label),
    Call(Label),
    Jump(Label),
    Jz(Label),
    Jn(Label),
    Ret,
    Exit,
    OutC,
    OutN,
    InC,
    InN,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Push(_) => Opcode::Push,
            Self::Dup => Opcode::Dup,
            Self::Copy(_) => Opcode::Copy,
            Self::Swap => Opcode::Swap,
            Self::Discard => Opcode::Discard,
            Self::Slide(_) => Opcode::Slide,
            Self::Add => Opcode::Add,
            Self::Sub => Opcode::Sub,
            Self::Mul => Opcode::Mul,
            Self::Div => Opcode::Div,
            Self::Mod => Opcode::Mod,
            Self::Store => Opcode::Store,
            Self::Retrieve => Opcode::Retrieve,
            Self::Mark(_) => Opcode::Mark,
            Self::Call(_) => Opcode::Call,
            Self::Jump(_) => Opcode::Jump,
            Self::Jz(_) => Opcode::Jz,
            Self::Jn(_) => Opcode::Jn,
            Self::Ret => Opcode::Ret,
            Self::Exit => Opcode::Exit,
            Self::OutC => Opcode::OutC,
            Self::OutN => Opcode::OutN,
            Self::InC => Opcode::InC,
            Self::InN => Opcode::InN,
        }
    }

    /// Label this instruction transfers control to, if any.
    ///
    /// `Mark` declares a label rather than referencing one, so it returns `None`.
    pub fn target(&self) -> Option<Label> {
        match *self {
            Self::Call(l) | Self::Jump(l) | Self::Jz(l) | Self::Jn(l) => Some(l),
            _ => None,
        }
    }

    /// Append the whitespace encoding of this instruction to `out`.
    ///
    /// Magnitudes are written without leading zero digits; zero is written
    /// as an empty digit sequence.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend(self.opcode().codeword().iter().map(|w| w.to_byte()));
        match *self {
            Self::Push(v) => {
                out.push(if v < 0 { b'\t' } else { b' ' });
                encode_magnitude(v.unsigned_abs(), out);
            }
            Self::Copy(n) | Self::Slide(n) => encode_magnitude(n, out),
            Self::Mark(l) | Self::Call(l) | Self::Jump(l) | Self::Jz(l) | Self::Jn(l) => {
                encode_magnitude(l.get(), out)
            }
            _ => {}
        }
    }
}

fn encode_magnitude(value: u64, out: &mut Vec<u8>) {
    let bits = u64::BITS - value.leading_zeros();
    for i in (0..bits).rev() {
        out.push(if (value >> i) & 1 == 1 { b'\t' } else { b' ' });
    }
    out.push(b'\n');
}

/// Encode a whole instruction sequence to whitespace source.
pub fn encode_all<'a>(instructions: impl IntoIterator<Item = &'a Instruction>) -> Vec<u8> {
    let mut out = Vec::new();
    for instr in instructions {
        instr.encode(&mut out);
    }
    out
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match *self {
            Self::Push(v) => write!(f, "{mnemonic} {v}"),
            Self::Copy(n) | Self::Slide(n) => write!(f, "{mnemonic} {n}"),
            Self::Mark(l) | Self::Call(l) | Self::Jump(l) | Self::Jz(l) | Self::Jn(l) => {
                write!(f, "{mnemonic} {l}")
            }
            _ => f.write_str(mnemonic),
        }
    }
}

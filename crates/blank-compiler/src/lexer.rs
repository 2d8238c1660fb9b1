//! Codeword scanner.
//!
//! Works in two passes:
//! 1. Filter the source down to significant characters, remembering each
//!    one's byte offset in the original input for diagnostics.
//! 2. Walk the filtered stream, recognizing one codeword at a time with a
//!    nested exhaustive match and decoding the binary argument that follows
//!    `Push`, `Copy`, `Slide` and the label-carrying flow opcodes.
//!
//! ## Error handling
//!
//! Strict by default: the first unknown or truncated codeword aborts with a
//! [`LexError`]. In lenient mode the scanner skips one character at such a
//! position and tries again. Argument errors are fatal in both modes.

use blank_bytecode::{Instruction, Label, Opcode, Ws};

use super::error::LexError;

/// Lexer settings.
#[derive(Clone, Copy, Debug, Default)]
pub struct LexerConfig {
    lenient: bool,
}

impl LexerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip unrecognized characters instead of failing.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }
}

/// Decode `source` into an instruction sequence.
pub fn lex(source: &[u8], config: &LexerConfig) -> Result<Vec<Instruction>, LexError> {
    let mut scanner = Scanner::new(source);
    let mut instructions = Vec::new();

    while !scanner.at_end() {
        let start = scanner.pos;
        let opcode = match scanner.codeword() {
            Ok(opcode) => opcode,
            Err(err) if config.lenient => {
                tracing::trace!(%err, "skipping unrecognized character");
                scanner.pos = start + 1;
                continue;
            }
            Err(err) => return Err(err),
        };
        instructions.push(scanner.instruction(opcode, start)?);
    }

    Ok(instructions)
}

/// Cursor over the significant characters of a source.
#[derive(Debug)]
struct Scanner<'s> {
    source: &'s [u8],
    /// Significant characters paired with their byte offset in `source`.
    chars: Vec<(Ws, usize)>,
    pos: usize,
}

impl<'s> Scanner<'s> {
    fn new(source: &'s [u8]) -> Self {
        let chars = source
            .iter()
            .enumerate()
            .filter_map(|(offset, &b)| Ws::from_byte(b).map(|ws| (ws, offset)))
            .collect();
        Self {
            source,
            chars,
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Byte offset of the filtered character at `pos`, or the source length past the end.
    fn offset_of(&self, pos: usize) -> usize {
        self.chars
            .get(pos)
            .map_or(self.source.len(), |&(_, offset)| offset)
    }

    fn bump(&mut self) -> Option<Ws> {
        let (ws, _) = *self.chars.get(self.pos)?;
        self.pos += 1;
        Some(ws)
    }

    /// Characters consumed since `start`, rendered as `S`/`T`/`N`.
    fn consumed(&self, start: usize) -> String {
        self.chars[start..self.pos]
            .iter()
            .map(|(ws, _)| ws.letter())
            .collect()
    }

    /// Next codeword character; running out of input here truncates the codeword.
    fn codeword_char(&mut self, start: usize) -> Result<Ws, LexError> {
        self.bump().ok_or_else(|| LexError::TruncatedCodeword {
            offset: self.offset_of(start),
            codeword: self.consumed(start),
        })
    }

    fn unknown(&self, start: usize) -> LexError {
        LexError::UnknownCodeword {
            offset: self.offset_of(start),
            codeword: self.consumed(start),
        }
    }

    /// Recognize one codeword at the cursor.
    fn codeword(&mut self) -> Result<Opcode, LexError> {
        use Ws::{Lf as N, Space as S, Tab as T};

        let start = self.pos;
        let opcode = match self.codeword_char(start)? {
            // Stack manipulation
            S => match self.codeword_char(start)? {
                S => Opcode::Push,
                T => match self.codeword_char(start)? {
                    S => Opcode::Copy,
                    N => Opcode::Slide,
                    T => return Err(self.unknown(start)),
                },
                N => match self.codeword_char(start)? {
                    S => Opcode::Dup,
                    T => Opcode::Swap,
                    N => Opcode::Discard,
                },
            },
            T => match self.codeword_char(start)? {
                // Arithmetic
                S => match self.codeword_char(start)? {
                    S => match self.codeword_char(start)? {
                        S => Opcode::Add,
                        T => Opcode::Sub,
                        N => Opcode::Mul,
                    },
                    T => match self.codeword_char(start)? {
                        S => Opcode::Div,
                        T => Opcode::Mod,
                        N => return Err(self.unknown(start)),
                    },
                    N => return Err(self.unknown(start)),
                },
                // Heap access
                T => match self.codeword_char(start)? {
                    S => Opcode::Store,
                    T => Opcode::Retrieve,
                    N => return Err(self.unknown(start)),
                },
                // I/O
                N => match self.codeword_char(start)? {
                    S => match self.codeword_char(start)? {
                        S => Opcode::OutC,
                        T => Opcode::OutN,
                        N => return Err(self.unknown(start)),
                    },
                    T => match self.codeword_char(start)? {
                        S => Opcode::InC,
                        T => Opcode::InN,
                        N => return Err(self.unknown(start)),
                    },
                    N => return Err(self.unknown(start)),
                },
            },
            // Flow control
            N => match self.codeword_char(start)? {
                S => match self.codeword_char(start)? {
                    S => Opcode::Mark,
                    T => Opcode::Call,
                    N => Opcode::Jump,
                },
                T => match self.codeword_char(start)? {
                    S => Opcode::Jz,
                    T => Opcode::Jn,
                    N => Opcode::Ret,
                },
                N => match self.codeword_char(start)? {
                    N => Opcode::Exit,
                    S | T => return Err(self.unknown(start)),
                },
            },
        };
        Ok(opcode)
    }

    /// Decode the argument (if any) for `opcode` whose codeword began at `start`.
    fn instruction(&mut self, opcode: Opcode, start: usize) -> Result<Instruction, LexError> {
        let instr = match opcode {
            Opcode::Push => Instruction::Push(self.signed(opcode, start)?),
            Opcode::Copy => Instruction::Copy(self.unsigned(opcode, start)?),
            Opcode::Slide => Instruction::Slide(self.unsigned(opcode, start)?),
            Opcode::Mark => Instruction::Mark(self.label(opcode, start)?),
            Opcode::Call => Instruction::Call(self.label(opcode, start)?),
            Opcode::Jump => Instruction::Jump(self.label(opcode, start)?),
            Opcode::Jz => Instruction::Jz(self.label(opcode, start)?),
            Opcode::Jn => Instruction::Jn(self.label(opcode, start)?),
            Opcode::Dup => Instruction::Dup,
            Opcode::Swap => Instruction::Swap,
            Opcode::Discard => Instruction::Discard,
            Opcode::Add => Instruction::Add,
            Opcode::Sub => Instruction::Sub,
            Opcode::Mul => Instruction::Mul,
            Opcode::Div => Instruction::Div,
            Opcode::Mod => Instruction::Mod,
            Opcode::Store => Instruction::Store,
            Opcode::Retrieve => Instruction::Retrieve,
            Opcode::Ret => Instruction::Ret,
            Opcode::Exit => Instruction::Exit,
            Opcode::OutC => Instruction::OutC,
            Opcode::OutN => Instruction::OutN,
            Opcode::InC => Instruction::InC,
            Opcode::InN => Instruction::InN,
        };
        Ok(instr)
    }

    fn label(&mut self, opcode: Opcode, start: usize) -> Result<Label, LexError> {
        self.unsigned(opcode, start).map(Label::new)
    }

    /// Sign character, then magnitude. The sign slot is always consumed:
    /// only a tab is negative, a space or line feed is non-negative.
    fn signed(&mut self, opcode: Opcode, start: usize) -> Result<i64, LexError> {
        let sign = self
            .bump()
            .ok_or_else(|| self.unterminated(opcode, start))?;
        let negative = sign == Ws::Tab;
        let magnitude = self.unsigned(opcode, start)?;
        let value = if negative {
            0i64.checked_sub_unsigned(magnitude)
        } else {
            i64::try_from(magnitude).ok()
        };
        value.ok_or_else(|| self.overflow(opcode, start))
    }

    /// Binary digits, most significant first, up to the closing line feed.
    fn unsigned(&mut self, opcode: Opcode, start: usize) -> Result<u64, LexError> {
        let mut value: u64 = 0;
        loop {
            let ws = self
                .bump()
                .ok_or_else(|| self.unterminated(opcode, start))?;
            let Some(bit) = ws.bit() else {
                return Ok(value);
            };
            value = value
                .checked_mul(2)
                .and_then(|v| v.checked_add(bit))
                .ok_or_else(|| self.overflow(opcode, start))?;
        }
    }

    fn unterminated(&self, opcode: Opcode, start: usize) -> LexError {
        LexError::UnterminatedArgument {
            offset: self.offset_of(start),
            opcode,
        }
    }

    fn overflow(&self, opcode: Opcode, start: usize) -> LexError {
        LexError::ArgumentOverflow {
            offset: self.offset_of(start),
            opcode,
        }
    }
}

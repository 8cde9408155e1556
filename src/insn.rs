//! Bytecode instructions for a compiled regex

use crate::error::Error;
use crate::types::GroupID;
use core::fmt;

/// A signed jump, relative to the end of the jump instruction.
pub type JumpOffset = i32;

/// Placeholder offset for a jump to the final Fail instruction.
/// Only present while compiling; a valid Program never contains it.
pub const JUMP_FAIL: JumpOffset = JumpOffset::MAX;

/// Encoded width of an instruction carrying a jump offset.
pub const JUMP_WIDTH: usize = 1 + core::mem::size_of::<JumpOffset>();

/// The largest program the compiler will produce, in bytes.
pub const MAX_PROGRAM_LEN: usize = 1 << 20;

/// The opcode byte of each instruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    TestSingle,
    TestRange,
    TestNegatedRange,
    TestAny,
    TestDigit,
    TestLowerCase,
    TestUpperCase,
    /// Jump if the status flag is set.
    JumpEq,
    /// Jump if the status flag is clear.
    JumpNeq,
    Accept,
    Fail,
    GroupStart,
    GroupEnd,
    IncPos,
    DecPos,
    /// Advance the string position if the status flag is set.
    IncPosEq,
    /// Move the string position by a signed amount.
    JumpPos,
    SetFlag,
}

impl Opcode {
    const ALL: [Opcode; 18] = [
        Opcode::TestSingle,
        Opcode::TestRange,
        Opcode::TestNegatedRange,
        Opcode::TestAny,
        Opcode::TestDigit,
        Opcode::TestLowerCase,
        Opcode::TestUpperCase,
        Opcode::JumpEq,
        Opcode::JumpNeq,
        Opcode::Accept,
        Opcode::Fail,
        Opcode::GroupStart,
        Opcode::GroupEnd,
        Opcode::IncPos,
        Opcode::DecPos,
        Opcode::IncPosEq,
        Opcode::JumpPos,
        Opcode::SetFlag,
    ];

    #[inline]
    pub fn from_byte(b: u8) -> Option<Opcode> {
        Opcode::ALL.get(b as usize).copied()
    }

    /// \return the number of bytes an instruction with this opcode occupies.
    #[inline]
    pub fn width(self) -> usize {
        match self {
            Opcode::TestSingle | Opcode::GroupStart | Opcode::GroupEnd | Opcode::SetFlag => 2,
            Opcode::TestRange | Opcode::TestNegatedRange => 3,
            Opcode::JumpEq | Opcode::JumpNeq | Opcode::JumpPos => JUMP_WIDTH,
            Opcode::TestAny
            | Opcode::TestDigit
            | Opcode::TestLowerCase
            | Opcode::TestUpperCase
            | Opcode::Accept
            | Opcode::Fail
            | Opcode::IncPos
            | Opcode::DecPos
            | Opcode::IncPosEq => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// The list of bytecode instructions.
pub enum Insn {
    /// Test the current byte against a literal.
    TestSingle(u8),

    /// Test that the current byte is within [first, last].
    TestRange { first: u8, last: u8 },

    /// Test that the current byte is outside [first, last].
    TestNegatedRange { first: u8, last: u8 },

    /// Test that there is a current byte.
    TestAny,

    TestDigit,
    TestLowerCase,
    TestUpperCase,

    JumpEq(JumpOffset),
    JumpNeq(JumpOffset),

    /// The match was successful.
    Accept,

    /// The match failed.
    Fail,

    /// Group markers. These do not affect matching.
    GroupStart(GroupID),
    GroupEnd(GroupID),

    IncPos,
    DecPos,
    IncPosEq,
    JumpPos(JumpOffset),

    /// Force the status flag.
    SetFlag(bool),
}

impl Insn {
    pub fn opcode(&self) -> Opcode {
        match self {
            Insn::TestSingle(_) => Opcode::TestSingle,
            Insn::TestRange { .. } => Opcode::TestRange,
            Insn::TestNegatedRange { .. } => Opcode::TestNegatedRange,
            Insn::TestAny => Opcode::TestAny,
            Insn::TestDigit => Opcode::TestDigit,
            Insn::TestLowerCase => Opcode::TestLowerCase,
            Insn::TestUpperCase => Opcode::TestUpperCase,
            Insn::JumpEq(_) => Opcode::JumpEq,
            Insn::JumpNeq(_) => Opcode::JumpNeq,
            Insn::Accept => Opcode::Accept,
            Insn::Fail => Opcode::Fail,
            Insn::GroupStart(_) => Opcode::GroupStart,
            Insn::GroupEnd(_) => Opcode::GroupEnd,
            Insn::IncPos => Opcode::IncPos,
            Insn::DecPos => Opcode::DecPos,
            Insn::IncPosEq => Opcode::IncPosEq,
            Insn::JumpPos(_) => Opcode::JumpPos,
            Insn::SetFlag(_) => Opcode::SetFlag,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.opcode().width()
    }

    /// \return the jump offset of a conditional jump.
    pub fn jump_offset(&self) -> Option<JumpOffset> {
        match *self {
            Insn::JumpEq(offset) | Insn::JumpNeq(offset) => Some(offset),
            _ => None,
        }
    }

    /// Append the encoding of this instruction to \p out.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.opcode() as u8);
        match *self {
            Insn::TestSingle(c) => out.push(c),
            Insn::TestRange { first, last } | Insn::TestNegatedRange { first, last } => {
                out.push(first);
                out.push(last);
            }
            Insn::JumpEq(offset) | Insn::JumpNeq(offset) | Insn::JumpPos(offset) => {
                out.extend_from_slice(&offset.to_be_bytes())
            }
            Insn::GroupStart(id) | Insn::GroupEnd(id) => out.push(id),
            Insn::SetFlag(v) => out.push(v as u8),
            Insn::TestAny
            | Insn::TestDigit
            | Insn::TestLowerCase
            | Insn::TestUpperCase
            | Insn::Accept
            | Insn::Fail
            | Insn::IncPos
            | Insn::DecPos
            | Insn::IncPosEq => {}
        }
    }

    /// Decode the instruction starting at \p pc.
    /// \return None if the opcode is unknown or its operands are truncated.
    pub fn decode(code: &[u8], pc: usize) -> Option<Insn> {
        let op = Opcode::from_byte(*code.get(pc)?)?;
        let operands = code.get(pc + 1..pc + op.width())?;
        let offset = || {
            let bytes: [u8; 4] = operands.try_into().ok()?;
            Some(JumpOffset::from_be_bytes(bytes))
        };
        let insn = match op {
            Opcode::TestSingle => Insn::TestSingle(operands[0]),
            Opcode::TestRange => Insn::TestRange {
                first: operands[0],
                last: operands[1],
            },
            Opcode::TestNegatedRange => Insn::TestNegatedRange {
                first: operands[0],
                last: operands[1],
            },
            Opcode::TestAny => Insn::TestAny,
            Opcode::TestDigit => Insn::TestDigit,
            Opcode::TestLowerCase => Insn::TestLowerCase,
            Opcode::TestUpperCase => Insn::TestUpperCase,
            Opcode::JumpEq => Insn::JumpEq(offset()?),
            Opcode::JumpNeq => Insn::JumpNeq(offset()?),
            Opcode::Accept => Insn::Accept,
            Opcode::Fail => Insn::Fail,
            Opcode::GroupStart => Insn::GroupStart(operands[0]),
            Opcode::GroupEnd => Insn::GroupEnd(operands[0]),
            Opcode::IncPos => Insn::IncPos,
            Opcode::DecPos => Insn::DecPos,
            Opcode::IncPosEq => Insn::IncPosEq,
            Opcode::JumpPos => Insn::JumpPos(offset()?),
            Opcode::SetFlag => Insn::SetFlag(operands[0] != 0),
        };
        Some(insn)
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Insn::TestSingle(c) => write!(f, "TESTSINGLE {}", c as char),
            Insn::TestRange { first, last } => {
                write!(f, "TESTRANGE {}-{}", first as char, last as char)
            }
            Insn::TestNegatedRange { first, last } => {
                write!(f, "TESTNEGRANGE {}-{}", first as char, last as char)
            }
            Insn::TestAny => f.write_str("TESTANY"),
            Insn::TestDigit => f.write_str("TESTDIGIT"),
            Insn::TestLowerCase => f.write_str("TESTLOWERCASE"),
            Insn::TestUpperCase => f.write_str("TESTUPPERCASE"),
            Insn::JumpEq(offset) => write!(f, "JUMPEQ {:+}", offset),
            Insn::JumpNeq(offset) => write!(f, "JUMPNEQ {:+}", offset),
            Insn::Accept => f.write_str("ACCEPT"),
            Insn::Fail => f.write_str("FAIL"),
            Insn::GroupStart(id) => write!(f, "GROUPSTART {}", id),
            Insn::GroupEnd(id) => write!(f, "GROUPEND {}", id),
            Insn::IncPos => f.write_str("INCPOS"),
            Insn::DecPos => f.write_str("DECPOS"),
            Insn::IncPosEq => f.write_str("INCPOSEQ"),
            Insn::JumpPos(offset) => write!(f, "JUMPPOS {:+}", offset),
            Insn::SetFlag(v) => write!(f, "SETFLAG {}", v as u8),
        }
    }
}

/// \return the absolute target of a jump at \p pc with \p offset, if it is
/// not negative.
#[inline]
pub fn jump_target(pc: usize, offset: JumpOffset) -> Option<usize> {
    let next = pc.checked_add(JUMP_WIDTH)? as i64;
    usize::try_from(next + offset as i64).ok()
}

/// A compiled program: a flat, validated, immutable instruction buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    code: Box<[u8]>,
}

impl Program {
    /// The program with no instructions, which rejects every input.
    pub fn empty() -> Program {
        Program::default()
    }

    /// Validate \p code as a program.
    /// Every instruction must decode, and every conditional jump must land on
    /// an instruction boundary or the end of the program.
    pub fn from_bytes(code: Vec<u8>) -> Result<Program, Error> {
        let mut boundaries = vec![false; code.len() + 1];
        let mut jumps = Vec::new();
        let mut pc = 0;
        while pc < code.len() {
            boundaries[pc] = true;
            let insn = Insn::decode(&code, pc).ok_or_else(|| match Opcode::from_byte(code[pc]) {
                Some(op) => Error::invalid_program(pc, format!("truncated {:?}", op)),
                None => Error::invalid_program(pc, format!("unknown opcode {}", code[pc])),
            })?;
            if let Some(offset) = insn.jump_offset() {
                if offset == JUMP_FAIL {
                    return Err(Error::invalid_program(pc, "unresolved fail jump"));
                }
                jumps.push((pc, offset));
            }
            pc += insn.width();
        }
        boundaries[code.len()] = true;
        for (pc, offset) in jumps {
            match jump_target(pc, offset) {
                Some(target) if target < boundaries.len() && boundaries[target] => {}
                _ => {
                    return Err(Error::invalid_program(
                        pc,
                        format!("jump {:+} does not land on an instruction", offset),
                    ))
                }
            }
        }
        Ok(Program {
            code: code.into_boxed_slice(),
        })
    }

    /// Assemble and validate a sequence of instructions.
    pub fn from_insns(insns: &[Insn]) -> Result<Program, Error> {
        let mut code = Vec::with_capacity(insns.iter().map(Insn::width).sum());
        for insn in insns {
            insn.encode(&mut code);
        }
        Program::from_bytes(code)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    /// \return the length of the program in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Decode the instruction at \p pc.
    #[inline]
    pub fn insn_at(&self, pc: usize) -> Option<Insn> {
        Insn::decode(&self.code, pc)
    }

    /// \return an iterator over (offset, instruction) pairs.
    pub fn insns(&self) -> Insns<'_> {
        Insns { code: &self.code, pc: 0 }
    }

    /// Run the program against \p input.
    #[inline]
    pub fn is_match(&self, input: &[u8]) -> bool {
        crate::exec::execute(self, input)
    }
}

/// An iterator over the instructions of a Program.
#[derive(Debug, Clone)]
pub struct Insns<'a> {
    code: &'a [u8],
    pc: usize,
}

impl Iterator for Insns<'_> {
    type Item = (usize, Insn);

    fn next(&mut self) -> Option<Self::Item> {
        let pc = self.pc;
        let insn = Insn::decode(self.code, pc)?;
        self.pc += insn.width();
        Some((pc, insn))
    }
}

//! Regex compiler back-end: transforms postfix tokens into a Program

use crate::error::Error;
use crate::insn::{
    jump_target, Insn, JumpOffset, Program, JUMP_FAIL, JUMP_WIDTH, MAX_PROGRAM_LEN,
};
use crate::types::{BracketRange, CharacterType, OperatorType, Token, TokenKind};

/// How a fragment is wired into larger fragments.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum FragmentKind {
    /// A single character test, followed by its conditional advance.
    TestOp,
    /// A repetition; always reports success.
    UnaryOp,
    /// A concatenation or alternation.
    BinaryOp,
    /// A group marker. It tests nothing, so no flag check follows it.
    GroupOp,
}

/// The offset of a jump instruction within a fragment's code.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct JumpSite(usize);

/// \return the offset which makes the jump at \p site land on \p target.
fn offset_to(site: JumpSite, target: usize) -> Result<JumpOffset, Error> {
    let offset = target as i64 - (site.0 + JUMP_WIDTH) as i64;
    match JumpOffset::try_from(offset) {
        Ok(offset) if offset != JUMP_FAIL => Ok(offset),
        _ => Err(Error::compile_fault(format!("jump offset {} out of range", offset))),
    }
}

/// Encoded width of SetFlag.
const SET_FLAG_WIDTH: usize = 2;

/// Reject a program or fragment of \p size bytes if it is over the limit.
/// Called before the bytes are built.
fn check_size(size: usize) -> Result<(), Error> {
    if size > MAX_PROGRAM_LEN {
        return Err(Error::ProgramTooLarge {
            size,
            limit: MAX_PROGRAM_LEN,
        });
    }
    Ok(())
}

/// A partially built chunk of bytecode.
#[derive(Debug)]
struct Fragment {
    kind: FragmentKind,
    code: Vec<u8>,
}

impl Fragment {
    fn new(kind: FragmentKind) -> Fragment {
        Fragment {
            kind,
            code: Vec::new(),
        }
    }

    /// Create an empty fragment which will hold \p size bytes.
    fn with_size(kind: FragmentKind, size: usize) -> Result<Fragment, Error> {
        check_size(size)?;
        Ok(Fragment {
            kind,
            code: Vec::with_capacity(size),
        })
    }

    fn from_insns(kind: FragmentKind, insns: &[Insn]) -> Fragment {
        let mut frag = Fragment::new(kind);
        for insn in insns {
            frag.emit(*insn);
        }
        frag
    }

    /// \return the offset of the next instruction emitted.
    fn next_offset(&self) -> usize {
        self.code.len()
    }

    fn emit(&mut self, insn: Insn) {
        insn.encode(&mut self.code)
    }

    /// Emit a jump whose offset will be patched later.
    fn emit_jump(&mut self, insn: Insn) -> JumpSite {
        debug_assert!(insn.jump_offset().is_some(), "Should be a jump");
        let site = JumpSite(self.next_offset());
        self.emit(insn);
        site
    }

    /// Point the jump at \p site to \p target.
    fn patch(&mut self, site: JumpSite, target: usize) -> Result<(), Error> {
        let offset = offset_to(site, target)?;
        self.code[site.0 + 1..site.0 + JUMP_WIDTH].copy_from_slice(&offset.to_be_bytes());
        Ok(())
    }

    fn append(&mut self, other: &[u8]) {
        self.code.extend_from_slice(other)
    }

    /// Append a greedy loop over \p body: repeat while the body matches,
    /// then report success.
    fn append_loop(&mut self, body: &[u8]) -> Result<(), Error> {
        let loop_start = self.next_offset();
        self.append(body);
        let back = self.emit_jump(Insn::JumpEq(0));
        self.patch(back, loop_start)?;
        self.emit(Insn::SetFlag(true));
        Ok(())
    }
}

/// \return the test instruction for a bracket.
fn make_range_test(br: BracketRange) -> Insn {
    match (br.invert, br.first, br.last) {
        (true, first, last) => Insn::TestNegatedRange { first, last },
        (false, b'0', b'9') => Insn::TestDigit,
        (false, b'a', b'z') => Insn::TestLowerCase,
        (false, b'A', b'Z') => Insn::TestUpperCase,
        (false, first, last) => Insn::TestRange { first, last },
    }
}

/// Type which wraps up the context needed to emit a Program.
struct Emitter {
    fragments: Vec<Fragment>,
}

impl Emitter {
    fn pop(&mut self, op: OperatorType) -> Result<Fragment, Error> {
        self.fragments
            .pop()
            .ok_or_else(|| Error::compile_fault(format!("fragment stack underflow at {}", op)))
    }

    fn push(&mut self, frag: Fragment) {
        self.fragments.push(frag)
    }

    fn emit_operator(&mut self, op: OperatorType) -> Result<(), Error> {
        let frag = match op {
            OperatorType::Concatenate => {
                let rhs = self.pop(op)?;
                let lhs = self.pop(op)?;
                let check = if lhs.kind != FragmentKind::GroupOp {
                    JUMP_WIDTH
                } else {
                    0
                };
                let size = lhs.code.len() + check + rhs.code.len();
                let mut frag = Fragment::with_size(FragmentKind::BinaryOp, size)?;
                frag.append(&lhs.code);
                // If the left side failed, abandon the whole match.
                if lhs.kind != FragmentKind::GroupOp {
                    frag.emit(Insn::JumpNeq(JUMP_FAIL));
                }
                frag.append(&rhs.code);
                frag
            }
            OperatorType::Alternate => {
                let rhs = self.pop(op)?;
                let lhs = self.pop(op)?;
                let size = lhs.code.len() + JUMP_WIDTH + rhs.code.len();
                let mut frag = Fragment::with_size(FragmentKind::BinaryOp, size)?;
                frag.append(&lhs.code);
                // If the left side matched, skip the right side.
                let skip = frag.emit_jump(Insn::JumpEq(0));
                frag.append(&rhs.code);
                let end = frag.next_offset();
                frag.patch(skip, end)?;
                frag
            }
            OperatorType::ZeroOrMore => {
                let body = self.pop(op)?;
                let size = body.code.len() + JUMP_WIDTH + SET_FLAG_WIDTH;
                let mut frag = Fragment::with_size(FragmentKind::UnaryOp, size)?;
                frag.append_loop(&body.code)?;
                frag
            }
            OperatorType::OneOrMore => {
                let body = self.pop(op)?;
                // The body is emitted twice, so nested '+' doubles in size.
                let size = 2 * (body.code.len() + JUMP_WIDTH) + SET_FLAG_WIDTH;
                let mut frag = Fragment::with_size(FragmentKind::UnaryOp, size)?;
                frag.append(&body.code);
                frag.emit(Insn::JumpNeq(JUMP_FAIL));
                frag.append_loop(&body.code)?;
                frag
            }
            OperatorType::ZeroOrOne => {
                let body = self.pop(op)?;
                let size = body.code.len() + SET_FLAG_WIDTH;
                let mut frag = Fragment::with_size(FragmentKind::UnaryOp, size)?;
                frag.append(&body.code);
                frag.emit(Insn::SetFlag(true));
                frag
            }
        };
        self.push(frag);
        Ok(())
    }

    fn emit_token(&mut self, token: &Token) -> Result<(), Error> {
        log::trace!("emit {} with {} fragments", token, self.fragments.len());
        let frag = match token.kind {
            TokenKind::Character(CharacterType::Single) => {
                let c = *token
                    .data
                    .as_bytes()
                    .first()
                    .ok_or_else(|| Error::compile_fault("character token without data"))?;
                Fragment::from_insns(FragmentKind::TestOp, &[Insn::TestSingle(c), Insn::IncPosEq])
            }
            TokenKind::Character(CharacterType::Any) => {
                Fragment::from_insns(FragmentKind::TestOp, &[Insn::TestAny, Insn::IncPosEq])
            }
            TokenKind::CharacterRange => {
                let br = token.bracket().ok_or_else(|| {
                    Error::compile_fault(format!("malformed range token {}", token))
                })?;
                Fragment::from_insns(
                    FragmentKind::TestOp,
                    &[make_range_test(br), Insn::IncPosEq],
                )
            }
            TokenKind::GroupBegin(id) => {
                Fragment::from_insns(FragmentKind::GroupOp, &[Insn::GroupStart(id)])
            }
            TokenKind::GroupEnd(id) => {
                Fragment::from_insns(FragmentKind::GroupOp, &[Insn::GroupEnd(id)])
            }
            TokenKind::Operator(op) => return self.emit_operator(op),
            TokenKind::Invalid => {
                return Err(Error::compile_fault(format!("unexpected token {}", token)))
            }
        };
        self.push(frag);
        Ok(())
    }

    /// Terminate the remaining fragment with Accept and Fail, and resolve
    /// every fail jump.
    fn finish(mut self) -> Result<Program, Error> {
        let last = match self.fragments.len() {
            0 => return Program::from_insns(&[Insn::Accept]),
            1 => self.fragments.pop(),
            n => {
                return Err(Error::compile_fault(format!(
                    "{} fragments left after compiling",
                    n
                )))
            }
        };
        let mut code = last.map(|frag| frag.code).unwrap_or_default();
        // JumpNeq, Accept, Fail.
        check_size(code.len() + JUMP_WIDTH + 2)?;
        Insn::JumpNeq(JUMP_FAIL).encode(&mut code);
        Insn::Accept.encode(&mut code);
        let fail_addr = code.len();
        Insn::Fail.encode(&mut code);

        // The Fail address is only known now; patch every placeholder.
        let mut pc = 0;
        while pc < code.len() {
            let insn = Insn::decode(&code, pc).ok_or_else(|| {
                Error::compile_fault(format!("undecodable instruction at {}", pc))
            })?;
            if insn.jump_offset() == Some(JUMP_FAIL) {
                let offset = offset_to(JumpSite(pc), fail_addr)?;
                debug_assert_eq!(jump_target(pc, offset), Some(fail_addr));
                code[pc + 1..pc + JUMP_WIDTH].copy_from_slice(&offset.to_be_bytes());
            }
            pc += insn.width();
        }
        Program::from_bytes(code).map_err(Error::compile_fault)
    }
}

/// Compile postfix tokens, as produced by the parser, to a Program.
pub fn emit(postfix: &[Token]) -> Result<Program, Error> {
    let mut emitter = Emitter {
        fragments: Vec::new(),
    };
    for token in postfix {
        emitter.emit_token(token)?;
    }
    emitter.finish()
}

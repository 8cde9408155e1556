//! Bytecode interpreter

use crate::insn::{jump_target, Insn, JumpOffset, Program};
use crate::types::BracketRange;

/// The result of executing one instruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep going at the new pc.
    Continue,
    /// Halt, reporting a match.
    Accept,
    /// Halt, reporting no match.
    Fail,
}

/// The registers of the machine.
#[derive(Debug, Clone, Default)]
pub struct State {
    /// Offset of the next instruction.
    pub pc: usize,

    /// Offset of the current input byte.
    pub sp: usize,

    /// Result of the most recent test.
    pub flag: bool,

    /// For each backward jump taken so far, the string position when it was
    /// last taken.
    loop_marks: Vec<(usize, usize)>,
}

impl State {
    pub fn new() -> State {
        State::default()
    }

    /// Record that the backward jump at \p pc is being taken.
    /// \return false if no input was consumed since it was last taken, in
    /// which case the jump must fall through.
    fn enter_loop(&mut self, pc: usize) -> bool {
        let sp = self.sp;
        match self.loop_marks.iter_mut().find(|(mark_pc, _)| *mark_pc == pc) {
            Some((_, mark_sp)) if *mark_sp >= sp => false,
            Some((_, mark_sp)) => {
                *mark_sp = sp;
                true
            }
            None => {
                self.loop_marks.push((pc, sp));
                true
            }
        }
    }

    /// Perform the jump at the current pc, if \p taken.
    fn jump(&mut self, offset: JumpOffset, taken: bool) -> Step {
        let pc = self.pc;
        let fallthrough = pc + Insn::JumpEq(offset).width();
        let target = match jump_target(pc, offset) {
            Some(target) => target,
            None => return Step::Fail,
        };
        self.pc = if !taken {
            fallthrough
        } else if target > pc || self.enter_loop(pc) {
            target
        } else {
            log::trace!("{:04}: no progress since last iteration, exiting loop", pc);
            fallthrough
        };
        Step::Continue
    }

    /// Move the string position by \p delta.
    fn move_pos(&mut self, delta: i64) -> Step {
        match usize::try_from(self.sp as i64 + delta) {
            Ok(sp) => {
                self.sp = sp;
                Step::Continue
            }
            Err(_) => Step::Fail,
        }
    }
}

#[inline(always)]
fn range_test(cur: Option<u8>, invert: bool, first: u8, last: u8) -> bool {
    let br = BracketRange {
        invert,
        first,
        last,
    };
    matches!(cur, Some(b) if br.contains(b))
}

/// Execute a single instruction of \p prog against \p input.
pub fn step(prog: &Program, input: &[u8], s: &mut State) -> Step {
    let insn = match prog.insn_at(s.pc) {
        Some(insn) => insn,
        None => return Step::Fail,
    };
    log::trace!("{:04}  {:<16} sp={} flag={}", s.pc, insn, s.sp, s.flag as u8);

    // Every test reports false at the end of the input.
    let cur = input.get(s.sp).copied();

    let next_pc = s.pc + insn.width();
    match insn {
        Insn::TestSingle(c) => s.flag = matches!(cur, Some(b) if b == c),
        Insn::TestRange { first, last } => s.flag = range_test(cur, false, first, last),
        Insn::TestNegatedRange { first, last } => s.flag = range_test(cur, true, first, last),
        Insn::TestAny => s.flag = cur.is_some(),
        Insn::TestDigit => s.flag = matches!(cur, Some(b) if b.is_ascii_digit()),
        Insn::TestLowerCase => s.flag = matches!(cur, Some(b) if b.is_ascii_lowercase()),
        Insn::TestUpperCase => s.flag = matches!(cur, Some(b) if b.is_ascii_uppercase()),
        Insn::JumpEq(offset) => return s.jump(offset, s.flag),
        Insn::JumpNeq(offset) => return s.jump(offset, !s.flag),
        Insn::Accept => return Step::Accept,
        Insn::Fail => return Step::Fail,
        Insn::GroupStart(_) | Insn::GroupEnd(_) => {}
        Insn::IncPos => s.sp += 1,
        Insn::DecPos => {
            if s.move_pos(-1) == Step::Fail {
                return Step::Fail;
            }
        }
        Insn::IncPosEq => {
            if s.flag {
                s.sp += 1
            }
        }
        Insn::JumpPos(offset) => {
            if s.move_pos(offset as i64) == Step::Fail {
                return Step::Fail;
            }
        }
        Insn::SetFlag(v) => s.flag = v,
    }
    s.pc = next_pc;
    Step::Continue
}

/// Run \p prog against \p input from the start.
/// \return true if the program reaches Accept.
pub fn execute(prog: &Program, input: &[u8]) -> bool {
    let mut s = State::new();
    while s.pc < prog.len() && s.sp <= input.len() {
        match step(prog, input, &mut s) {
            Step::Continue => {}
            Step::Accept => return true,
            Step::Fail => return false,
        }
    }
    false
}

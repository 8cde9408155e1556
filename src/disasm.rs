//! Human-readable listings of compiled programs

use crate::insn::{jump_target, Insn, Program};
use core::fmt;

fn display_insn(pc: usize, insn: Insn, f: &mut fmt::Formatter) -> fmt::Result {
    match insn {
        Insn::JumpEq(offset) | Insn::JumpNeq(offset) => match jump_target(pc, offset) {
            Some(target) => writeln!(f, "{:04}  {:<16}-> {:04}", pc, insn.to_string(), target),
            None => writeln!(f, "{:04}  {}", pc, insn),
        },
        _ => writeln!(f, "{:04}  {}", pc, insn),
    }
}

impl fmt::Display for Program {
    /// One instruction per line, prefixed by its offset. Conditional jumps
    /// also show their absolute target.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (pc, insn) in self.insns() {
            display_insn(pc, insn, f)?;
        }
        Ok(())
    }
}

/// \return a listing of \p prog.
pub fn disassemble(prog: &Program) -> String {
    prog.to_string()
}

/*!

# regvm - a small regular expression virtual machine

This crate compiles a small regular expression language to a flat bytecode
program, and runs that program on a flag-driven virtual machine.

# Example: test if a string matches

```rust
use regvm::Regex;
let re = Regex::new("a*b|cd").unwrap();
assert!(re.is_match("aaab"));
assert!(re.is_match("cd"));
assert!(!re.is_match("xyz"));
```

Matching is anchored at the start of the input, and succeeds as soon as the
pattern is matched; trailing input is ignored:

```rust
use regvm::Regex;
let re = Regex::new("[0-9]+").unwrap();
assert!(re.is_match("12345abcde"));
assert!(!re.is_match("abcde12345"));
```

# Example: looking at the bytecode

```rust
use regvm::{disasm, Regex};
let re = Regex::new("a?").unwrap();
print!("{}", disasm::disassemble(re.program()));
// Output: 0000  TESTSINGLE a
// Output: 0002  INCPOSEQ
// Output: 0003  SETFLAG 1
// Output: 0005  JUMPNEQ +1      -> 0011
// Output: 0010  ACCEPT
// Output: 0011  FAIL
```

# Supported Syntax

- Literals: ASCII letters, digits and `_`.
- `.` matches any single byte.
- Brackets of the form `[lo-hi]` and `[^lo-hi]`.
- Postfix operators `*`, `+` and `?`, which are greedy and never backtrack.
- Alternation `|` and grouping `(...)`.

Anything else, including escapes and anchors, is rejected with an error.

# Architecture

A pattern is lexed into tokens, converted to postfix order with the
shunting-yard algorithm, and emitted as bytecode fragment by fragment. Jumps
to the final `FAIL` instruction are emitted as placeholders and patched once
the program is complete.

The machine has a program counter, a string position and a single status
flag. Test instructions set the flag; conditional jumps and `INCPOSEQ`
consult it. There is no backtracking.

*/

#![warn(clippy::all)]
#![allow(clippy::upper_case_acronyms, clippy::match_like_matches_macro)]
// Clippy's manual_range_contains suggestion produces worse codegen.
#![allow(clippy::manual_range_contains)]

pub use crate::api::*;
pub use crate::error::{Error, ErrorKind};
pub use crate::insn::{Insn, Insns, JumpOffset, Opcode, Program, JUMP_FAIL, MAX_PROGRAM_LEN};
pub use crate::types::{
    BracketRange, CharacterType, GroupID, OperatorType, Token, TokenKind, MAX_GROUPS,
};

mod api;
pub mod disasm;
mod emit;
mod error;
mod exec;
mod insn;
mod lex;
mod parse;
mod types;

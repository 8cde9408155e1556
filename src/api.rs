use crate::emit;
use crate::error::Error;
use crate::insn::Program;
use crate::lex;
use crate::parse;
use crate::types::Token;

use core::{fmt, str::FromStr};

/// Flags used to control regex compilation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// If set, log the tokens, the postfix tokens and the disassembled
    /// program at debug level while compiling.
    pub debug: bool,
}

impl Flags {
    /// Construct a Flags from an iterator of flag characters.
    /// 'd' means debug. Other flags are ignored.
    #[inline]
    pub fn new<T: Iterator<Item = char>>(chars: T) -> Self {
        let mut result = Self::default();
        // Silently skip unsupported flags.
        for c in chars {
            if c == 'd' {
                result.debug = true;
            }
        }
        result
    }
}

impl From<&str> for Flags {
    /// Construct a Flags from a string of flag characters.
    ///
    /// See also: [`Flags::new`].
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s.chars())
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.debug {
            f.write_str("d")?;
        }
        Ok(())
    }
}

/// Lex, parse and emit \p pattern, logging each phase if requested.
fn compile_program(pattern: &str, flags: Flags) -> Result<Program, Error> {
    let tokens = lex::lex(pattern)?;
    if flags.debug {
        log::debug!("tokens for {:?}:\n{}", pattern, backends::dump_tokens(&tokens));
    }
    let postfix = parse::to_postfix(&tokens)?;
    if flags.debug {
        log::debug!("postfix for {:?}:\n{}", pattern, backends::dump_tokens(&postfix));
    }
    let prog = emit::emit(&postfix)?;
    if flags.debug {
        log::debug!("bytecode for {:?}:\n{}", pattern, prog);
    }
    Ok(prog)
}

/// A Regex is the compiled version of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    prog: Program,
    flags: Flags,
}

impl From<Program> for Regex {
    fn from(prog: Program) -> Self {
        Self {
            prog,
            flags: Flags::default(),
        }
    }
}

impl Regex {
    /// Construct a regex by compiling `pattern` using the default flags.
    /// An Error may be returned if the syntax is invalid.
    #[inline]
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Self::with_flags(pattern, Flags::default())
    }

    /// Construct a regex by compiling `pattern` with `flags`.
    /// An Error may be returned if the syntax is invalid.
    ///
    /// A Regex is immutable once built; it may be matched repeatedly and
    /// shared between threads.
    pub fn with_flags<F>(pattern: &str, flags: F) -> Result<Regex, Error>
    where
        F: Into<Flags>,
    {
        let flags = flags.into();
        let prog = compile_program(pattern, flags)?;
        Ok(Regex { prog, flags })
    }

    /// Construct a regex by compiling `pattern`, never failing.
    /// If the pattern is invalid, the error is logged and the resulting
    /// regex has an empty program, which rejects every input.
    pub fn compile<F>(pattern: &str, flags: F) -> Regex
    where
        F: Into<Flags>,
    {
        let flags = flags.into();
        match compile_program(pattern, flags) {
            Ok(prog) => Regex { prog, flags },
            Err(err) => {
                log::error!("failed to compile {:?}: {}", pattern, err);
                Regex {
                    prog: Program::empty(),
                    flags,
                }
            }
        }
    }

    /// Test whether `text` matches, starting at its first byte.
    /// Characters after the matched prefix are ignored.
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.is_match_bytes(text.as_bytes())
    }

    /// Test whether `bytes` matches, starting at its first byte.
    #[inline]
    pub fn is_match_bytes(&self, bytes: &[u8]) -> bool {
        self.prog.is_match(bytes)
    }

    /// \return the compiled program.
    #[inline]
    pub fn program(&self) -> &Program {
        &self.prog
    }

    /// \return the flags the regex was compiled with.
    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Attempts to compile a string into a regular expression
    #[inline]
    fn from_str(s: &str) -> Result<Self, Error> {
        Self::new(s)
    }
}

// Access to the individual compilation phases and the machine.
#[doc(hidden)]
pub mod backends {
    use super::Token;
    pub use crate::emit::emit;
    pub use crate::exec::{execute, step, State, Step};
    pub use crate::lex::lex;
    pub use crate::parse::to_postfix;

    /// Format \p tokens one per line.
    pub fn dump_tokens(tokens: &[Token]) -> String {
        let lines: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        lines.join("\n")
    }
}

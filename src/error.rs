//! Errors produced while compiling a pattern or validating a program.

use crate::types::OperatorType;
use thiserror::Error;

/// The compilation phase an error belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Compile,
    Program,
}

/// Represents an error encountered during regex compilation.
/// The Display form is a human-readable error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unsupported character found in regular expression: {character}")]
    UnsupportedCharacter { character: char, offset: usize },

    #[error("Unclosed character range in regular expression")]
    UnterminatedBracket { offset: usize },

    #[error("Invalid character range: [{contents}]")]
    InvalidRange { contents: String },

    #[error("Mismatched parentheses in regular expression")]
    MismatchedParentheses,

    #[error("Invalid token type during parsing: {token}")]
    InvalidToken { token: String },

    #[error("Nothing to apply operator {operator} to")]
    MissingOperand { operator: OperatorType },

    #[error("Capture group count limit exceeded")]
    GroupLimitExceeded,

    #[error("Compiled program would be {size} bytes, over the limit of {limit}")]
    ProgramTooLarge { size: usize, limit: usize },

    /// The compiler reached a state that parser-approved input cannot produce.
    #[error("Internal compiler fault: {reason}")]
    CompileFault { reason: String },

    #[error("Invalid program at offset {offset}: {reason}")]
    InvalidProgram { offset: usize, reason: String },
}

impl Error {
    /// \return the phase which produced this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedCharacter { .. }
            | Error::UnterminatedBracket { .. }
            | Error::InvalidRange { .. } => ErrorKind::Lex,
            Error::MismatchedParentheses
            | Error::InvalidToken { .. }
            | Error::MissingOperand { .. }
            | Error::GroupLimitExceeded => ErrorKind::Parse,
            Error::ProgramTooLarge { .. } | Error::CompileFault { .. } => ErrorKind::Compile,
            Error::InvalidProgram { .. } => ErrorKind::Program,
        }
    }

    pub(crate) fn compile_fault<S: ToString>(reason: S) -> Error {
        Error::CompileFault {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_program<S: ToString>(offset: usize, reason: S) -> Error {
        Error::InvalidProgram {
            offset,
            reason: reason.to_string(),
        }
    }
}

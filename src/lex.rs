//! Lexer from regex patterns to an infix token stream

use crate::error::Error;
use crate::types::{BracketRange, CharacterType, OperatorType, Token, TokenKind};
use memchr::memchr;

/// Represents the state used to lex a pattern.
struct Lexer<'p> {
    /// The full pattern; tokens borrow from it.
    pattern: &'p str,

    /// Offset of the next byte to examine.
    pos: usize,

    tokens: Vec<Token<'p>>,

    /// Whether the previous token ended an operand, so that a following
    /// operand must be joined with an implicit concatenation.
    need_concat: bool,
}

impl<'p> Lexer<'p> {
    fn push(&mut self, len: usize, kind: TokenKind) {
        let pattern = self.pattern;
        let data = &pattern[self.pos..self.pos + len];
        self.tokens.push(Token::new(data, kind));
    }

    /// Push an operand-starting token of \p len bytes, inserting a
    /// concatenation first if one is pending.
    fn push_operand(&mut self, len: usize, kind: TokenKind) {
        if self.need_concat {
            self.tokens.push(Token::concatenation());
        }
        self.push(len, kind);
    }

    /// Consume a bracket expression starting at the '['.
    /// \return the number of bytes consumed, including both brackets.
    fn consume_bracket(&mut self) -> Result<usize, Error> {
        let pattern = self.pattern;
        let start = self.pos + 1;
        let close = match memchr(b']', &pattern.as_bytes()[start..]) {
            Some(off) => start + off,
            None => return Err(Error::UnterminatedBracket { offset: self.pos }),
        };
        let contents = &pattern[start..close];
        if BracketRange::parse(contents).is_none() {
            return Err(Error::InvalidRange {
                contents: contents.to_string(),
            });
        }
        if self.need_concat {
            self.tokens.push(Token::concatenation());
        }
        self.tokens
            .push(Token::new(contents, TokenKind::CharacterRange));
        self.need_concat = true;
        Ok(close + 1 - self.pos)
    }

    fn unsupported(&self) -> Error {
        // The pattern is a str, so pos is always on a char boundary here:
        // we only ever step over ASCII bytes.
        let character = self.pattern[self.pos..].chars().next().unwrap_or('\0');
        Error::UnsupportedCharacter {
            character,
            offset: self.pos,
        }
    }

    fn run(mut self) -> Result<Vec<Token<'p>>, Error> {
        let pattern = self.pattern;
        let bytes = pattern.as_bytes();
        while self.pos < bytes.len() {
            let c = bytes[self.pos];
            let mut advance = 1;
            match c {
                c if c.is_ascii_alphanumeric() || c == b'_' => {
                    self.push_operand(1, TokenKind::Character(CharacterType::Single));
                    self.need_concat = true;
                }
                b'.' => {
                    self.push_operand(1, TokenKind::Character(CharacterType::Any));
                    self.need_concat = true;
                }
                b'|' => {
                    self.push(1, TokenKind::Operator(OperatorType::Alternate));
                    self.need_concat = false;
                }
                b'*' => self.push(1, TokenKind::Operator(OperatorType::ZeroOrMore)),
                b'+' => self.push(1, TokenKind::Operator(OperatorType::OneOrMore)),
                b'?' => self.push(1, TokenKind::Operator(OperatorType::ZeroOrOne)),
                b'(' => {
                    self.push_operand(1, TokenKind::GroupBegin(0));
                    self.need_concat = false;
                }
                b')' => {
                    self.push(1, TokenKind::GroupEnd(0));
                    self.need_concat = true;
                }
                b'[' => advance = self.consume_bracket()?,
                _ => return Err(self.unsupported()),
            }
            self.pos += advance;
        }
        Ok(self.tokens)
    }
}

/// Split \p pattern into tokens, inserting implicit concatenations.
/// Return the tokens, or an error for unsupported syntax.
pub fn lex(pattern: &str) -> Result<Vec<Token<'_>>, Error> {
    let lexer = Lexer {
        pattern,
        pos: 0,
        tokens: Vec::new(),
        need_concat: false,
    };
    let tokens = lexer.run()?;
    log::trace!("lexed {:?} into {} tokens", pattern, tokens.len());
    Ok(tokens)
}

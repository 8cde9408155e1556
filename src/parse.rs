//! Parser from infix tokens to postfix tokens, via shunting-yard

use crate::error::Error;
use crate::types::{GroupID, OperatorType, Token, TokenKind, MAX_GROUPS};

/// Represents the state used to parse a token stream.
struct Parser<'p> {
    /// Postfix output.
    output: Vec<Token<'p>>,

    /// Pending operators and open groups.
    operators: Vec<Token<'p>>,

    /// Number of groups opened so far.
    group_count: usize,

    /// Number of complete operands the output reduces to so far.
    /// Used to reject operators with nothing to apply to.
    operands: usize,

    /// Whether the previous token completed an operand, so that an
    /// operator may follow it.
    after_operand: bool,
}

impl<'p> Parser<'p> {
    /// Append an operator to the output, checking that it has its operands.
    fn output_operator(&mut self, token: Token<'p>, op: OperatorType) -> Result<(), Error> {
        let arity = op.arity();
        if self.operands < arity {
            return Err(Error::MissingOperand { operator: op });
        }
        self.operands -= arity - 1;
        self.output.push(token);
        Ok(())
    }

    /// Pop stacked operators which bind at least as tightly as \p op.
    fn push_operator(&mut self, token: Token<'p>, op: OperatorType) -> Result<(), Error> {
        while let Some(&top) = self.operators.last() {
            let stacked = match top.operator() {
                Some(stacked) => stacked,
                // A group begin: stop here.
                None => break,
            };
            let pops = stacked.precedence() > op.precedence()
                || (stacked.precedence() == op.precedence() && op.is_left_associative());
            if !pops {
                break;
            }
            self.operators.pop();
            self.output_operator(top, stacked)?;
        }
        self.operators.push(token);
        Ok(())
    }

    fn open_group(&mut self, token: Token<'p>) -> Result<(), Error> {
        if self.group_count >= MAX_GROUPS {
            return Err(Error::GroupLimitExceeded);
        }
        self.group_count += 1;
        let id = self.group_count as GroupID;
        self.operators
            .push(Token::new(token.data, TokenKind::GroupBegin(id)));
        Ok(())
    }

    /// Pop operators until the matching group begin, which is discarded.
    fn close_group(&mut self) -> Result<(), Error> {
        loop {
            let top = self.operators.pop().ok_or(Error::MismatchedParentheses)?;
            match top.kind {
                TokenKind::GroupBegin(id) => {
                    log::trace!("closed group {}", id);
                    return Ok(());
                }
                TokenKind::Operator(op) => self.output_operator(top, op)?,
                _ => return Err(Error::MismatchedParentheses),
            }
        }
    }

    fn finish(mut self) -> Result<Vec<Token<'p>>, Error> {
        while let Some(top) = self.operators.pop() {
            match top.kind {
                TokenKind::Operator(op) => self.output_operator(top, op)?,
                _ => return Err(Error::MismatchedParentheses),
            }
        }
        if self.operands > 1 {
            return Err(Error::MissingOperand {
                operator: OperatorType::Concatenate,
            });
        }
        Ok(self.output)
    }

    fn run(mut self, tokens: &[Token<'p>]) -> Result<Vec<Token<'p>>, Error> {
        for &token in tokens {
            match token.kind {
                TokenKind::Character(_) | TokenKind::CharacterRange => {
                    self.output.push(token);
                    self.operands += 1;
                    self.after_operand = true;
                }
                TokenKind::Operator(op) => {
                    if !self.after_operand {
                        return Err(Error::MissingOperand { operator: op });
                    }
                    self.push_operator(token, op)?;
                    // Only a postfix operator leaves an operand behind.
                    self.after_operand = op.arity() == 1;
                }
                TokenKind::GroupBegin(_) => {
                    self.open_group(token)?;
                    self.after_operand = false;
                }
                TokenKind::GroupEnd(_) => {
                    self.close_group()?;
                    self.after_operand = true;
                }
                TokenKind::Invalid => {
                    return Err(Error::InvalidToken {
                        token: token.to_string(),
                    })
                }
            }
        }
        self.finish()
    }
}

/// Convert an infix token stream to postfix (Reverse Polish) order.
/// Groups are numbered from 1 in order of their opening parenthesis; group
/// tokens themselves do not appear in the output.
pub fn to_postfix<'p>(tokens: &[Token<'p>]) -> Result<Vec<Token<'p>>, Error> {
    let parser = Parser {
        output: Vec::with_capacity(tokens.len()),
        operators: Vec::new(),
        group_count: 0,
        operands: 0,
        after_operand: false,
    };
    parser.run(tokens)
}

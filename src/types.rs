use core::fmt;

/// A group index is u8, because the group opcodes carry a single byte.
/// GroupID 0 is never assigned; the first group is 1.
pub type GroupID = u8;

/// The maximum number of groups supported.
pub const MAX_GROUPS: usize = GroupID::MAX as usize;

/// The flavors of a character token.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CharacterType {
    /// A literal character.
    Single,

    /// `.`, which matches any character.
    Any,
}

impl CharacterType {
    fn name(self) -> &'static str {
        match self {
            CharacterType::Single => "Single",
            CharacterType::Any => "Any",
        }
    }
}

/// The operators understood by the parser.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperatorType {
    Alternate,
    Concatenate,
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
}

impl OperatorType {
    /// \return the binding strength of the operator. Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            OperatorType::Alternate => 1,
            OperatorType::Concatenate => 2,
            OperatorType::ZeroOrMore | OperatorType::OneOrMore | OperatorType::ZeroOrOne => 3,
        }
    }

    /// Postfix operators are not left associative.
    pub fn is_left_associative(self) -> bool {
        match self {
            OperatorType::Alternate | OperatorType::Concatenate => true,
            OperatorType::ZeroOrMore | OperatorType::OneOrMore | OperatorType::ZeroOrOne => false,
        }
    }

    /// \return the number of operands the operator consumes.
    pub fn arity(self) -> usize {
        match self {
            OperatorType::Alternate | OperatorType::Concatenate => 2,
            OperatorType::ZeroOrMore | OperatorType::OneOrMore | OperatorType::ZeroOrOne => 1,
        }
    }
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OperatorType::Alternate => "Alternate",
            OperatorType::Concatenate => "Concatenate",
            OperatorType::ZeroOrMore => "ZeroOrMore",
            OperatorType::OneOrMore => "OneOrMore",
            OperatorType::ZeroOrOne => "ZeroOrOne",
        };
        f.write_str(name)
    }
}

/// The kind of a token, together with its kind-specific encoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Character(CharacterType),

    /// A bracket expression. The token data holds the raw bracket contents.
    CharacterRange,

    Operator(OperatorType),

    /// Open a group. The lexer produces id 0; the parser assigns the real id.
    GroupBegin(GroupID),

    GroupEnd(GroupID),

    Invalid,
}

/// One lexical unit of a pattern.
/// `data` borrows from the pattern; it is empty for synthesized tokens.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Token<'p> {
    pub data: &'p str,
    pub kind: TokenKind,
}

impl<'p> Token<'p> {
    pub const fn new(data: &'p str, kind: TokenKind) -> Self {
        Token { data, kind }
    }

    /// An implicit concatenation, inserted between juxtaposed operands.
    pub const fn concatenation() -> Self {
        Token::new("", TokenKind::Operator(OperatorType::Concatenate))
    }

    /// \return the operator type, if this is an operator token.
    pub fn operator(&self) -> Option<OperatorType> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Interpret the data of a CharacterRange token.
    pub fn bracket(&self) -> Option<BracketRange> {
        match self.kind {
            TokenKind::CharacterRange => BracketRange::parse(self.data),
            _ => None,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Character(ct) if self.data.is_empty() => write!(f, "CHAR({})", ct.name()),
            TokenKind::Character(ct) => write!(f, "CHAR({}, {})", self.data, ct.name()),
            TokenKind::CharacterRange => write!(f, "RANGE({})", self.data),
            TokenKind::Operator(op) => write!(f, "OP({})", op),
            TokenKind::GroupBegin(id) => write!(f, "GROUP_BEGIN({})", id),
            TokenKind::GroupEnd(id) => write!(f, "GROUP_END({})", id),
            TokenKind::Invalid => f.write_str("INVALID"),
        }
    }
}

/// The contents of a bracket, like `[a-z]` or `[^0-9]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BracketRange {
    pub invert: bool,
    pub first: u8,
    pub last: u8,
}

impl BracketRange {
    /// Parse raw bracket contents of the form `lo-hi` or `^lo-hi`.
    /// \return None if the contents are malformed or the range is reversed.
    pub fn parse(contents: &str) -> Option<BracketRange> {
        let (invert, bytes) = match contents.as_bytes() {
            [b'^', rest @ ..] => (true, rest),
            bytes => (false, bytes),
        };
        match bytes {
            &[first, b'-', last] if first.is_ascii() && last.is_ascii() && first <= last => {
                Some(BracketRange {
                    invert,
                    first,
                    last,
                })
            }
            _ => None,
        }
    }

    /// \return whether the bracket matches the byte \p b. Respects 'invert'.
    #[inline(always)]
    pub fn contains(&self, b: u8) -> bool {
        (self.first <= b && b <= self.last) != self.invert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_orders_operators() {
        use OperatorType::*;
        assert!(Alternate.precedence() < Concatenate.precedence());
        for op in [ZeroOrMore, OneOrMore, ZeroOrOne] {
            assert!(Concatenate.precedence() < op.precedence());
            assert!(!op.is_left_associative());
            assert_eq!(op.arity(), 1);
        }
        assert!(Alternate.is_left_associative());
        assert!(Concatenate.is_left_associative());
    }

    #[test]
    fn bracket_parsing() {
        assert_eq!(
            BracketRange::parse("a-z"),
            Some(BracketRange {
                invert: false,
                first: b'a',
                last: b'z'
            })
        );
        assert_eq!(
            BracketRange::parse("^0-9"),
            Some(BracketRange {
                invert: true,
                first: b'0',
                last: b'9'
            })
        );
        assert_eq!(BracketRange::parse("z-a"), None);
        assert_eq!(BracketRange::parse("abc"), None);
        assert_eq!(BracketRange::parse("a-"), None);
        assert_eq!(BracketRange::parse(""), None);
        assert_eq!(BracketRange::parse("^"), None);
    }

    #[test]
    fn bracket_contains() {
        let br = BracketRange::parse("b-e").unwrap();
        assert!(br.contains(b'b') && br.contains(b'e'));
        assert!(!br.contains(b'a') && !br.contains(b'f'));
        let inv = BracketRange::parse("^b-e").unwrap();
        assert!(!inv.contains(b'c'));
        assert!(inv.contains(b'x'));
    }

    #[test]
    fn token_display() {
        assert_eq!(
            Token::new("a", TokenKind::Character(CharacterType::Single)).to_string(),
            "CHAR(a, Single)"
        );
        assert_eq!(
            Token::new("", TokenKind::Character(CharacterType::Any)).to_string(),
            "CHAR(Any)"
        );
        assert_eq!(Token::concatenation().to_string(), "OP(Concatenate)");
        assert_eq!(
            Token::new("0-9", TokenKind::CharacterRange).to_string(),
            "RANGE(0-9)"
        );
        assert_eq!(
            Token::new("(", TokenKind::GroupBegin(3)).to_string(),
            "GROUP_BEGIN(3)"
        );
        assert_eq!(Token::new("", TokenKind::Invalid).to_string(), "INVALID");
    }
}

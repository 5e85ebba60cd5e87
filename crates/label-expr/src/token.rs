//! Token types produced by the lexer.

use std::collections::BTreeSet;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Kind of a token, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Parenthesised sub-expression.
    #[serde(rename = "GROUP")]
    Group,
    /// Prefix negation `!`.
    #[serde(rename = "NOT")]
    Not,
    /// Disjunction `||`.
    #[serde(rename = "OR")]
    Or,
    /// Conjunction `&&`.
    #[serde(rename = "AND")]
    And,
    /// Implication `->`.
    #[serde(rename = "IMPLY")]
    Imply,
    /// Biconditional `<->`.
    #[serde(rename = "ONLYIF")]
    OnlyIf,
    /// Label identifier.
    #[serde(rename = "ID")]
    Id,
}

impl TokenKind {
    /// Binding strength used during reduction (higher binds tighter).
    ///
    /// Identifiers are operands and have no precedence.
    pub fn precedence(self) -> Option<u8> {
        match self {
            TokenKind::Group => Some(5),
            TokenKind::Not => Some(4),
            TokenKind::And => Some(3),
            TokenKind::Or => Some(2),
            TokenKind::Imply => Some(1),
            TokenKind::OnlyIf => Some(0),
            TokenKind::Id => None,
        }
    }

    /// Upper-case name, as used in JSON output.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Group => "GROUP",
            TokenKind::Not => "NOT",
            TokenKind::Or => "OR",
            TokenKind::And => "AND",
            TokenKind::Imply => "IMPLY",
            TokenKind::OnlyIf => "ONLYIF",
            TokenKind::Id => "ID",
        }
    }

    /// Operator text, for operator kinds.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            TokenKind::Not => Some("!"),
            TokenKind::Or => Some("||"),
            TokenKind::And => Some("&&"),
            TokenKind::Imply => Some("->"),
            TokenKind::OnlyIf => Some("<->"),
            TokenKind::Group | TokenKind::Id => None,
        }
    }

    /// True for the two-operand operators.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            TokenKind::And | TokenKind::Or | TokenKind::Imply | TokenKind::OnlyIf
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(symbol) => f.write_str(symbol),
            None => f.write_str(self.name()),
        }
    }
}

/// A lexed token of a label expression.
///
/// Groups own their fully tokenized interior, so a token sequence is a tree
/// encoded as a list whose elements may themselves hold lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Parenthesised sub-expression, already tokenized.
    Group(Vec<Token>),
    /// `!`
    Not,
    /// `||`
    Or,
    /// `&&`
    And,
    /// `->`
    Imply,
    /// `<->`
    OnlyIf,
    /// Label identifier: Unicode word characters and `-`.
    Id(String),
}

impl Token {
    /// Kind of this token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Group(_) => TokenKind::Group,
            Token::Not => TokenKind::Not,
            Token::Or => TokenKind::Or,
            Token::And => TokenKind::And,
            Token::Imply => TokenKind::Imply,
            Token::OnlyIf => TokenKind::OnlyIf,
            Token::Id(_) => TokenKind::Id,
        }
    }

    /// Build an operator token from its kind.
    ///
    /// Returns `None` for `Group` and `Id`, which carry a payload.
    pub fn operator(kind: TokenKind) -> Option<Token> {
        match kind {
            TokenKind::Not => Some(Token::Not),
            TokenKind::Or => Some(Token::Or),
            TokenKind::And => Some(Token::And),
            TokenKind::Imply => Some(Token::Imply),
            TokenKind::OnlyIf => Some(Token::OnlyIf),
            TokenKind::Group | TokenKind::Id => None,
        }
    }

    /// Shorthand for an identifier token.
    pub fn id(name: impl Into<String>) -> Token {
        Token::Id(name.into())
    }

    /// Collect every identifier named in this token, groups included.
    pub fn collect_identifiers<'a>(&'a self, into: &mut BTreeSet<&'a str>) {
        match self {
            Token::Id(name) => {
                into.insert(name.as_str());
            }
            Token::Group(tokens) => {
                for token in tokens {
                    token.collect_identifiers(into);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Id(name) => f.write_str(name),
            Token::Group(tokens) => {
                f.write_str("(")?;
                for token in tokens {
                    write!(f, "{}", token)?;
                }
                f.write_str(")")
            }
            other => write!(f, "{}", other.kind()),
        }
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Token", 2)?;
        state.serialize_field("type", &self.kind())?;
        match self {
            Token::Group(tokens) => state.serialize_field("value", tokens)?,
            Token::Id(name) => state.serialize_field("value", name)?,
            other => state.serialize_field("value", &other.kind().symbol())?,
        }
        state.end()
    }
}

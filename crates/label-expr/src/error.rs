//! Errors raised while parsing or evaluating label expressions.

use crate::token::TokenKind;

/// A label expression that cannot be parsed or reduced.
///
/// Positions are zero-based byte offsets into the original expression text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    #[error("label expression is empty")]
    Empty,

    #[error("unexpected character '{found}' at byte {position}")]
    UnexpectedCharacter { position: usize, found: char },

    #[error("unbalanced parenthesis at byte {position}")]
    UnbalancedParenthesis { position: usize },

    #[error("empty group at byte {position}")]
    EmptyGroup { position: usize },

    #[error("missing operand for `{operator}` at byte {position}")]
    MissingOperand { operator: TokenKind, position: usize },

    #[error("missing operator before byte {position}")]
    MissingOperator { position: usize },

    #[error("label expression nests too deeply at byte {position}")]
    TooDeep { position: usize },

    #[error("label expression could not be reduced to a single value")]
    Unreducible,
}

impl ExpressionError {
    /// Byte offset the error points at, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ExpressionError::UnexpectedCharacter { position, .. }
            | ExpressionError::UnbalancedParenthesis { position }
            | ExpressionError::EmptyGroup { position }
            | ExpressionError::MissingOperand { position, .. }
            | ExpressionError::MissingOperator { position }
            | ExpressionError::TooDeep { position } => Some(*position),
            ExpressionError::Empty | ExpressionError::Unreducible => None,
        }
    }
}

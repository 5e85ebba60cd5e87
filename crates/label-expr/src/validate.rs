//! Structural well-formedness of a token sequence.
//!
//! A sequence is well formed when it follows
//! `operand (binary-operator operand)*`, where an operand is any number of
//! `!` followed by an identifier or a non-empty group. The evaluator relies on
//! this shape to always find a window it can collapse.

use crate::error::ExpressionError;
use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing pushed yet.
    Start,
    /// The last token completed an operand.
    AfterOperand,
    /// An operator at the given position still needs its operand.
    AwaitingOperand(TokenKind, usize),
}

/// Incremental shape checker fed one token at a time by the scanner.
#[derive(Debug)]
pub(crate) struct Structure {
    state: State,
}

impl Structure {
    pub(crate) fn new() -> Self {
        Self { state: State::Start }
    }

    /// Record a token of `kind` starting at `position`.
    pub(crate) fn push(&mut self, kind: TokenKind, position: usize) -> Result<(), ExpressionError> {
        self.state = match (self.state, kind) {
            (State::AfterOperand, operator) if operator.is_binary() => {
                State::AwaitingOperand(operator, position)
            }
            (State::AfterOperand, _) => {
                return Err(ExpressionError::MissingOperator { position });
            }
            (_, TokenKind::Id | TokenKind::Group) => State::AfterOperand,
            (_, TokenKind::Not) => State::AwaitingOperand(kind, position),
            (_, operator) => {
                return Err(ExpressionError::MissingOperand { operator, position });
            }
        };
        Ok(())
    }

    /// Check the sequence is complete.
    ///
    /// `empty` is the error to report when no token was pushed at all.
    pub(crate) fn finish(self, empty: ExpressionError) -> Result<(), ExpressionError> {
        match self.state {
            State::Start => Err(empty),
            State::AfterOperand => Ok(()),
            State::AwaitingOperand(operator, position) => {
                Err(ExpressionError::MissingOperand { operator, position })
            }
        }
    }
}

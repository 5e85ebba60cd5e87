//! Label expressions for CI node selection.
//!
//! A label expression is a small boolean formula over node labels, such as
//! `(linux||macos)&&!arm64` or `docker->x86_64`, describing which execution
//! nodes may run a job. [`LabelExpression`] parses one once and then answers
//! whether any given label set satisfies it.
//!
//! ```
//! use label_expr::LabelExpression;
//!
//! let expr = LabelExpression::parse("(this||that)&&other").unwrap();
//! assert!(expr.matches(&["this", "other"]));
//! assert!(!expr.matches("other"));
//! ```

mod error;
mod eval;
mod labels;
mod lexer;
mod token;
mod validate;

pub use error::ExpressionError;
pub use labels::{LabelSet, Labels};
pub use lexer::{scan, tokenize, MAX_DEPTH};
pub use token::{Token, TokenKind};

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A parsed, immutable label expression.
///
/// Operators, from tightest to loosest binding: `( )`, `!`, `&&`, `||`,
/// `->` (implies), `<->` (if and only if).
#[derive(Clone, PartialEq, Eq)]
pub struct LabelExpression {
    expr: String,
    tokens: Vec<Token>,
}

impl LabelExpression {
    /// Parse an expression.
    ///
    /// # Errors
    /// Returns [`ExpressionError`] if the text contains characters outside the
    /// grammar, unbalanced parentheses, or an operator missing an operand.
    pub fn parse(expr: &str) -> Result<Self, ExpressionError> {
        let tokens = scan(expr)?;
        tracing::debug!(expression = expr, tokens = tokens.len(), "parsed label expression");
        Ok(Self {
            expr: expr.to_string(),
            tokens,
        })
    }

    /// The expression text as given.
    pub fn as_str(&self) -> &str {
        &self.expr
    }

    /// Top-level token sequence.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Every label the expression mentions, in sorted order.
    pub fn identifiers(&self) -> BTreeSet<&str> {
        let mut ids = BTreeSet::new();
        for token in &self.tokens {
            token.collect_identifiers(&mut ids);
        }
        ids
    }

    /// Whether `labels` satisfies the expression.
    ///
    /// Falls back to `false` if the expression cannot be reduced; parsed
    /// expressions always can.
    pub fn matches<L: Labels + ?Sized>(&self, labels: &L) -> bool {
        match self.try_matches(labels) {
            Ok(matched) => matched,
            Err(err) => {
                tracing::warn!(expression = %self.expr, error = %err, "treating expression as unmatched");
                false
            }
        }
    }

    /// Like [`matches`](Self::matches), but reports a failed reduction.
    ///
    /// # Errors
    /// Returns [`ExpressionError::Unreducible`] if the token sequence never
    /// collapses to a single value.
    pub fn try_matches<L: Labels + ?Sized>(&self, labels: &L) -> Result<bool, ExpressionError> {
        if let [Token::Id(label)] = self.tokens.as_slice() {
            return Ok(labels.contains_label(label));
        }
        eval::reduce(&self.tokens, labels).ok_or(ExpressionError::Unreducible)
    }
}

impl FromStr for LabelExpression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for LabelExpression {
    type Error = ExpressionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for LabelExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

impl fmt::Debug for LabelExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<LabelExpression {}>", self.expr)
    }
}

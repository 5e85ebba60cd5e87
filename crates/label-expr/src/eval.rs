//! Reduction of a token sequence to a single boolean.
//!
//! The working sequence starts as borrowed tokens and shrinks as windows are
//! replaced by their value. Positions are visited left to right; the scan
//! wraps to the start once it runs past the end of the sequence. An operator
//! only collapses once its operands are booleans and no operator of higher
//! precedence is still pending to its right.

use crate::labels::Labels;
use crate::token::{Token, TokenKind};

/// One slot of the working sequence.
#[derive(Debug, Clone, Copy)]
enum Node<'a> {
    Pending(&'a Token),
    Bool(bool),
}

impl Node<'_> {
    fn as_bool(self) -> Option<bool> {
        match self {
            Node::Bool(value) => Some(value),
            Node::Pending(_) => None,
        }
    }
}

/// Reduce `tokens` against `labels`.
///
/// Returns `None` when the sequence cannot be reduced, which a validated
/// expression never produces.
pub(crate) fn reduce<L: Labels + ?Sized>(tokens: &[Token], labels: &L) -> Option<bool> {
    reduce_nodes(tokens.iter().map(Node::Pending).collect(), labels)
}

fn reduce_nodes<L: Labels + ?Sized>(mut nodes: Vec<Node<'_>>, labels: &L) -> Option<bool> {
    if let [only] = nodes.as_slice() {
        return resolve(*only, labels);
    }

    let mut index = 0;
    let mut progressed = false;
    while nodes.len() > 1 {
        if index >= nodes.len() {
            if !progressed {
                return None;
            }
            index = 0;
            progressed = false;
        }
        if let Node::Pending(token) = nodes[index] {
            progressed |= step(&mut nodes, index, token, labels)?;
        }
        index += 1;
    }

    match nodes.as_slice() {
        [only] => resolve(*only, labels),
        _ => None,
    }
}

/// Value of a lone slot.
fn resolve<L: Labels + ?Sized>(node: Node<'_>, labels: &L) -> Option<bool> {
    match node {
        Node::Bool(value) => Some(value),
        Node::Pending(Token::Id(name)) => Some(labels.contains_label(name)),
        Node::Pending(Token::Group(tokens)) => reduce(tokens, labels),
        Node::Pending(_) => None,
    }
}

/// Try to make progress at `index`. Returns whether the sequence changed.
fn step<'a, L: Labels + ?Sized>(
    nodes: &mut Vec<Node<'a>>,
    index: usize,
    token: &'a Token,
    labels: &L,
) -> Option<bool> {
    match token {
        Token::Id(name) => {
            nodes[index] = Node::Bool(labels.contains_label(name));
            Some(true)
        }
        Token::Group(tokens) => {
            nodes[index] = Node::Bool(reduce(tokens, labels)?);
            Some(true)
        }
        Token::Not => {
            // Only a group can outrank `!`, and groups to the right are
            // resolved before this position is visited again.
            let Some(operand) = nodes.get(index + 1).and_then(|n| n.as_bool()) else {
                return Some(false);
            };
            nodes.splice(index..=index + 1, [Node::Bool(!operand)]);
            Some(true)
        }
        binary => collapse_binary(nodes, index, binary.kind(), labels),
    }
}

fn collapse_binary<L: Labels + ?Sized>(
    nodes: &mut Vec<Node<'_>>,
    index: usize,
    kind: TokenKind,
    labels: &L,
) -> Option<bool> {
    let left = index
        .checked_sub(1)
        .and_then(|i| nodes.get(i))
        .and_then(|n| n.as_bool());
    let right = nodes.get(index + 1).and_then(|n| n.as_bool());
    let (Some(left), Some(right)) = (left, right) else {
        return Some(false);
    };

    if nodes.len() == 3 {
        *nodes = vec![Node::Bool(combine(kind, left, right))];
        return Some(true);
    }
    if higher_precedence_pending(kind, &nodes[index + 2..]) {
        return Some(false);
    }

    let value = match kind {
        TokenKind::And => {
            nodes.splice(index - 1..=index + 1, [Node::Bool(left && right)]);
            return Some(true);
        }
        // The lower-precedence operators take their whole right-hand side.
        TokenKind::Or => left || reduce_nodes(nodes[index + 1..].to_vec(), labels)?,
        TokenKind::Imply => !left || reduce_nodes(nodes[index + 1..].to_vec(), labels)?,
        TokenKind::OnlyIf => left == reduce_nodes(nodes[index + 1..].to_vec(), labels)?,
        _ => return None,
    };
    nodes.truncate(index - 1);
    nodes.push(Node::Bool(value));
    Some(true)
}

fn combine(kind: TokenKind, left: bool, right: bool) -> bool {
    match kind {
        TokenKind::And => left && right,
        TokenKind::Or => left || right,
        TokenKind::Imply => !left || right,
        TokenKind::OnlyIf => left == right,
        _ => false,
    }
}

/// Whether anything in `rest` must be resolved before an operator of `kind`.
fn higher_precedence_pending(kind: TokenKind, rest: &[Node<'_>]) -> bool {
    let Some(current) = kind.precedence() else {
        return false;
    };
    rest.iter().any(|node| match node {
        Node::Pending(token) => token
            .kind()
            .precedence()
            .is_some_and(|precedence| precedence > current),
        Node::Bool(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn eval(expr: &str, labels: &[&str]) -> Option<bool> {
        reduce(&tokenize(expr), labels)
    }

    #[test]
    fn test_single_identifier() {
        assert_eq!(eval("a", &["a"]), Some(true));
        assert_eq!(eval("a", &["b"]), Some(false));
    }

    #[test]
    fn test_single_label_group() {
        assert_eq!(eval("(a)", &["a"]), Some(true));
        assert_eq!(eval("(a)&&b", &["a"]), Some(false));
        assert_eq!(eval("!(a)", &[]), Some(true));
    }

    #[test]
    fn test_top_level_group() {
        assert_eq!(eval("(a||b)", &["b"]), Some(true));
        assert_eq!(eval("(a||b)", &["c"]), Some(false));
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(eval("!!a", &["a"]), Some(true));
        assert_eq!(eval("!!!a", &["a"]), Some(false));
    }

    #[test]
    fn test_and_waits_for_not_on_the_right() {
        assert_eq!(eval("a&&b&&!c", &["a", "b"]), Some(true));
        assert_eq!(eval("a&&b&&!c", &["a", "b", "c"]), Some(false));
    }

    #[test]
    fn test_or_takes_whole_right_hand_side() {
        // `||` collapses once nothing to its right outranks it, and then
        // reduces everything to its right as its second operand.
        assert_eq!(eval("a||b->c", &["b"]), Some(false));
        assert_eq!(eval("a||b->c", &["a", "b"]), Some(true));
    }

    #[test]
    fn test_chains() {
        assert_eq!(eval("a||b||c", &["c"]), Some(true));
        assert_eq!(eval("a||b||c", &[]), Some(false));
        assert_eq!(eval("a&&b&&c", &["a", "b", "c"]), Some(true));
        assert_eq!(eval("a<->b<->c", &["a"]), Some(true));
    }

    #[test]
    fn test_dangling_operator_is_unreducible() {
        assert_eq!(eval("a&&", &["a"]), None);
        assert_eq!(eval("a b", &["a"]), None);
        assert_eq!(eval("||", &[]), None);
        assert_eq!(eval("()", &[]), None);
    }

    #[test]
    fn test_tokens_are_not_mutated() {
        let tokens = tokenize("(a||b)&&!c");
        let before = tokens.clone();
        assert_eq!(reduce(&tokens, &["a"]), Some(true));
        assert_eq!(reduce(&tokens, &["a", "c"]), Some(false));
        assert_eq!(tokens, before);
    }
}

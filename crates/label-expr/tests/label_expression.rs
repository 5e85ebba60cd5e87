//! Label expression matching tests.
//!
//! Truth tables for every operator, precedence between operator pairs, and
//! rejection of malformed expressions.

use label_expr::{ExpressionError, LabelExpression, Token, TokenKind, MAX_DEPTH};

fn parse(expr: &str) -> LabelExpression {
    LabelExpression::parse(expr).unwrap_or_else(|e| panic!("{expr}: {e}"))
}

fn id(name: &str) -> Token {
    Token::id(name)
}

// =============================================================================
// Single operators
// =============================================================================

#[test]
fn test_single_label() {
    let le = parse("label");
    assert_eq!(le.tokens()[0], id("label"));
    assert!(le.matches(&["label"]));
    assert!(!le.matches(&["foo"]));
}

#[test]
fn test_single_string_argument() {
    let le = parse("this||that");
    assert!(le.matches("this"));
    assert!(le.matches("that"));
    assert!(!le.matches("other"));
    assert!(le.matches(&["this", "other"]));
}

#[test]
fn test_group() {
    let le = parse("(this||that)&&other");
    assert_eq!(
        le.tokens(),
        &[
            Token::Group(vec![id("this"), Token::Or, id("that")]),
            Token::And,
            id("other"),
        ]
    );
    assert!(le.matches(&["this", "other"]));
    assert!(le.matches(&["that", "other"]));
    assert!(!le.matches(&["other"]));
    assert!(!le.matches(&["this"]));
    assert!(!le.matches(&["that"]));
    assert!(!le.matches(&["foo"]));
}

#[test]
fn test_not() {
    let le = parse("!this");
    assert_eq!(le.tokens(), &[Token::Not, id("this")]);
    assert!(!le.matches(&["this"]));
    assert!(le.matches(&["that"]));
    assert!(le.matches(&[] as &[&str]));
}

#[test]
fn test_and() {
    let le = parse("this&&that");
    assert_eq!(le.tokens(), parse("this && that").tokens());
    assert_eq!(le.tokens(), &[id("this"), Token::And, id("that")]);
    assert!(le.matches(&["this", "that"]));
    assert!(!le.matches(&["this", "foo"]));
    assert!(!le.matches(&["that", "foo"]));
    assert!(!le.matches(&["this"]));
    assert!(!le.matches(&["that"]));
    assert!(!le.matches(&["foo"]));
}

#[test]
fn test_or() {
    let le = parse("this||that");
    assert_eq!(le.tokens(), &[id("this"), Token::Or, id("that")]);
    assert!(le.matches(&["this", "foo"]));
    assert!(le.matches(&["that", "foo"]));
    assert!(le.matches(&["this", "that"]));
    assert!(!le.matches(&["foo"]));
    assert!(le.matches(&["this"]));
    assert!(le.matches(&["that"]));
}

#[test]
fn test_imply() {
    let le = parse("this->that");
    assert_eq!(le.tokens(), &[id("this"), Token::Imply, id("that")]);
    assert!(le.matches(&["this", "that"]));
    assert!(le.matches(&["other"]));
    assert!(!le.matches(&["this"]));
    assert!(le.matches(&["that"]));
}

#[test]
fn test_onlyif() {
    let le = parse("this<->that");
    assert_eq!(le.tokens(), &[id("this"), Token::OnlyIf, id("that")]);
    assert!(le.matches(&["this", "that"]));
    assert!(le.matches(&["foo", "bar"]));
    assert!(le.matches(&["foo"]));
    assert!(!le.matches(&["this"]));
    assert!(!le.matches(&["that"]));
}

// =============================================================================
// Operator pairs
// =============================================================================

#[test]
fn test_and_or() {
    let le = parse("this&&that||other");
    assert_eq!(
        le.tokens(),
        &[id("this"), Token::And, id("that"), Token::Or, id("other")]
    );
    assert!(le.matches(&["other"]));
    assert!(le.matches(&["this", "that"]));
    assert!(!le.matches(&["this"]));
    assert!(!le.matches(&["that"]));
    assert!(!le.matches(&["foo"]));
}

#[test]
fn test_or_and() {
    let le = parse("this||that&&other");
    assert!(le.matches(&["this"]));
    assert!(le.matches(&["that", "other"]));
    assert!(!le.matches(&["other"]));
    assert!(!le.matches(&["that"]));
    assert!(!le.matches(&["foo"]));
}

#[test]
fn test_and_imply() {
    let le = parse("this&&that->other");
    assert_eq!(
        le.tokens(),
        &[id("this"), Token::And, id("that"), Token::Imply, id("other")]
    );
    assert!(le.matches(&["this", "that", "other"]));
    assert!(le.matches(&["other"]));
    assert!(le.matches(&["this"]));
    assert!(le.matches(&["that"]));
    assert!(!le.matches(&["this", "that"]));
}

#[test]
fn test_imply_and() {
    let le = parse("this->that&&other");
    assert!(le.matches(&["this", "that", "other"]));
    assert!(le.matches(&["that", "other"]));
    assert!(!le.matches(&["this"]));
    assert!(le.matches(&["that"]));
    assert!(le.matches(&["other"]));
}

#[test]
fn test_and_onlyif() {
    let le = parse("this&&that<->other");
    assert!(le.matches(&["this", "that", "other"]));
    assert!(le.matches(&["foo"]));
    assert!(le.matches(&["this"]));
    assert!(le.matches(&["that"]));
    assert!(!le.matches(&["other"]));
    assert!(!le.matches(&["this", "that"]));
}

#[test]
fn test_onlyif_and() {
    let le = parse("this<->that&&other");
    assert_eq!(
        le.tokens(),
        &[id("this"), Token::OnlyIf, id("that"), Token::And, id("other")]
    );
    assert!(le.matches(&["this", "that", "other"]));
    assert!(le.matches(&["foo"]));
    assert!(!le.matches(&["this"]));
    assert!(le.matches(&["that"]));
    assert!(le.matches(&["other"]));
    assert!(!le.matches(&["this", "that"]));
}

#[test]
fn test_all_operators_reversed() {
    let le = parse("a<->b->c||d&&!(e||f)");
    assert!(le.matches(&["a", "b", "c"]));
    // d&&!(e||f) holds, so the right-hand side of `->` is true.
    assert!(le.matches(&["a", "b", "d"]));
    // b is absent, so b->... holds and matches a.
    assert!(le.matches(&["a", "c"]));
    assert!(!le.matches(&["a", "b"]));
    assert!(!le.matches(&["d", "e"]));
    assert!(!le.matches(&["d", "f"]));
    assert!(!le.matches(&["d"]));
    assert!(!le.matches("e"));
}

// =============================================================================
// Truth tables and grouping
// =============================================================================

const PRESENCE: [(bool, bool); 4] = [(false, false), (false, true), (true, false), (true, true)];

fn labels_for(a: bool, b: bool) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if a {
        labels.push("a");
    }
    if b {
        labels.push("b");
    }
    labels
}

#[test]
fn test_binary_truth_tables() {
    let cases: [(&str, fn(bool, bool) -> bool); 4] = [
        ("a&&b", |a, b| a && b),
        ("a||b", |a, b| a || b),
        ("a->b", |a, b| !a || b),
        ("a<->b", |a, b| a == b),
    ];
    for (text, expected) in cases {
        let le = parse(text);
        for (a, b) in PRESENCE {
            assert_eq!(
                le.matches(&labels_for(a, b)),
                expected(a, b),
                "{text} with a={a} b={b}"
            );
        }
    }
}

#[test]
fn test_grouping_changes_associativity() {
    assert!(parse("(a||b)&&c").matches(&["a", "c"]));
    assert!(parse("a||(b&&c)").matches(&["a"]));
    assert!(!parse("(a||b)&&c").matches(&["a"]));
}

#[test]
fn test_several_groups() {
    let le = parse("(linux||macos)&&(x86_64||arm64)");
    assert!(le.matches(&["macos", "arm64"]));
    assert!(!le.matches(&["windows", "arm64"]));
    assert!(!le.matches(&["linux"]));
}

#[test]
fn test_evaluation_does_not_mutate_expression() {
    let le = parse("(a||b)&&!(c||d)");
    let fresh = parse("(a||b)&&!(c||d)");
    assert!(le.matches(&["a"]));
    assert!(le.matches(&["a"]));
    assert!(!le.matches(&["b", "d"]));
    assert_eq!(le, fresh);
    for labels in [vec!["a", "c"], vec!["b"], vec![]] {
        assert_eq!(le.matches(&labels), fresh.matches(&labels));
    }
}

#[test]
fn test_non_ascii_labels() {
    let le = parse("café&&!节点");
    assert_eq!(le.tokens(), &[id("café"), Token::And, Token::Not, id("节点")]);
    assert!(le.matches(&["café"]));
    assert!(!le.matches(&["café", "节点"]));
    assert!(!le.matches(&["cafe"]));
}

// =============================================================================
// Malformed expressions
// =============================================================================

#[test]
fn test_malformed_expressions_are_rejected() {
    let cases = [
        ("", ExpressionError::Empty),
        ("a&&", ExpressionError::MissingOperand { operator: TokenKind::And, position: 1 }),
        ("||b", ExpressionError::MissingOperand { operator: TokenKind::Or, position: 0 }),
        ("!", ExpressionError::MissingOperand { operator: TokenKind::Not, position: 0 }),
        ("a b", ExpressionError::MissingOperator { position: 2 }),
        ("(a||b", ExpressionError::UnbalancedParenthesis { position: 0 }),
        ("a()", ExpressionError::MissingOperator { position: 1 }),
        ("a&&()", ExpressionError::EmptyGroup { position: 3 }),
        ("a&b", ExpressionError::UnexpectedCharacter { position: 1, found: '&' }),
    ];
    for (text, expected) in cases {
        assert_eq!(LabelExpression::parse(text), Err(expected), "{text:?}");
    }
}

#[test]
fn test_deep_nesting_is_rejected_not_fatal() {
    let deep = format!("{}a{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
    assert_eq!(
        LabelExpression::parse(&deep),
        Err(ExpressionError::TooDeep { position: MAX_DEPTH })
    );

    let hostile = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
    assert!(matches!(
        LabelExpression::parse(&hostile),
        Err(ExpressionError::TooDeep { .. })
    ));

    let limit = format!("!{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
    let le = parse(&limit);
    assert!(le.matches(&["b"]));
    assert!(!le.matches(&["a"]));
}

#[test]
fn test_long_disjunction_evaluates() {
    let names: Vec<String> = (0..MAX_DEPTH + 1).map(|i| format!("n{i}")).collect();
    let le = parse(&names.join("||"));
    assert!(le.matches(&[names[MAX_DEPTH].as_str()]));
    assert!(!le.matches(&["other"]));
}

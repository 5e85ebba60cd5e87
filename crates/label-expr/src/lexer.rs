//! Label expression tokenizer.
//!
//! At each position the patterns are tried in a fixed priority order:
//! `GROUP`, `NOT`, `OR`, `AND`, `IMPLY`, `ONLYIF`, `SKIP`, `ID`. The first one
//! that matches exactly at the position wins. Groups are tokenized recursively
//! and emitted as a single token owning the nested sequence.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::error::ExpressionError;
use crate::token::{Token, TokenKind};
use crate::validate::Structure;

/// Operators and whitespace, in priority order. Groups are matched
/// separately since their extent depends on the grouping mode, and
/// identifiers since regex-lite only knows ASCII `\w`.
const TOKEN_PATTERN: &str =
    r"^(?:(?P<NOT>!)|(?P<OR>\|\|)|(?P<AND>&&)|(?P<IMPLY>->)|(?P<ONLYIF><->)|(?P<SKIP>[ \t]+))";

/// Deepest evaluation nesting a scanned expression may need.
///
/// Each group adds a level, and so does each `||`, `->` or `<->`, since those
/// reduce their whole right-hand side as a nested sequence.
pub const MAX_DEPTH: usize = 256;

const OPERATORS: &[(&str, TokenKind)] = &[
    ("NOT", TokenKind::Not),
    ("OR", TokenKind::Or),
    ("AND", TokenKind::And),
    ("IMPLY", TokenKind::Imply),
    ("ONLYIF", TokenKind::OnlyIf),
];

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"))
}

/// How far a `(` extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// Up to the last `)` on the line.
    Greedy,
    /// Up to the matching `)`.
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexemeKind {
    Group,
    Skip,
    Token(TokenKind),
}

#[derive(Debug, Clone, Copy)]
struct Lexeme<'a> {
    kind: LexemeKind,
    text: &'a str,
}

impl Lexeme<'_> {
    /// Interior of a group lexeme, without the outer parentheses.
    fn interior(&self) -> &str {
        self.text
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or("")
    }
}

/// Match one lexeme at the start of `rest`.
fn next_lexeme(rest: &str, grouping: Grouping) -> Option<Lexeme<'_>> {
    if rest.starts_with('(') {
        let end = match grouping {
            Grouping::Greedy => greedy_group_end(rest)?,
            Grouping::Balanced => balanced_group_end(rest)?,
        };
        return Some(Lexeme {
            kind: LexemeKind::Group,
            text: &rest[..end],
        });
    }

    if let Some(captures) = token_pattern().captures(rest) {
        for (name, kind) in OPERATORS {
            if let Some(m) = captures.name(name) {
                return Some(Lexeme {
                    kind: LexemeKind::Token(*kind),
                    text: m.as_str(),
                });
            }
        }
        if let Some(m) = captures.name("SKIP") {
            return Some(Lexeme {
                kind: LexemeKind::Skip,
                text: m.as_str(),
            });
        }
    }

    // An identifier never swallows the `-` of a following `->`: it gives
    // back its last character when followed by `>`.
    let mut end = identifier_len(rest);
    if rest[end..].starts_with('>') {
        end = rest[..end].char_indices().last().map_or(0, |(index, _)| index);
    }
    if end == 0 {
        return None;
    }
    Some(Lexeme {
        kind: LexemeKind::Token(TokenKind::Id),
        text: &rest[..end],
    })
}

/// Unicode word characters and `-`.
fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Byte length of the identifier characters at the start of `rest`.
fn identifier_len(rest: &str) -> usize {
    rest.char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map_or(rest.len(), |(index, _)| index)
}

/// End (exclusive) of `\(.*\)` at the start of `rest`.
fn greedy_group_end(rest: &str) -> Option<usize> {
    let line = rest.split('\n').next().unwrap_or(rest);
    match line.rfind(')') {
        Some(close) if close > 0 => Some(close + 1),
        _ => None,
    }
}

/// End (exclusive) of the parenthesised span opened at the start of `rest`.
fn balanced_group_end(rest: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, byte) in rest.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Tokenize `text` the permissive way.
///
/// Groups extend to the last `)` on the line, and tokenizing silently stops
/// at the first position where no pattern matches, or at a group nested
/// deeper than [`MAX_DEPTH`]. Use [`scan`] to get an error instead.
///
/// ```
/// use label_expr::{tokenize, Token};
///
/// let tokens = tokenize("!linux && (arm64||x86_64)");
/// assert_eq!(tokens.len(), 4);
/// assert_eq!(tokens[0], Token::Not);
///
/// // An unrecognised character ends the sequence early.
/// assert_eq!(tokenize("a&&b.c"), vec![Token::id("a"), Token::And, Token::id("b")]);
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_at(text, 0)
}

fn tokenize_at(text: &str, depth: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(lexeme) = next_lexeme(&text[pos..], Grouping::Greedy) {
        match lexeme.kind {
            LexemeKind::Skip => {}
            LexemeKind::Group if depth >= MAX_DEPTH => break,
            LexemeKind::Group => tokens.push(Token::Group(tokenize_at(lexeme.interior(), depth + 1))),
            LexemeKind::Token(TokenKind::Id) => tokens.push(Token::id(lexeme.text)),
            LexemeKind::Token(kind) => tokens.extend(Token::operator(kind)),
        }
        pos += lexeme.text.len();
    }

    tokens
}

/// Tokenize `text`, rejecting anything that is not a well-formed expression.
///
/// Every character must belong to a token, parentheses must balance, the
/// token sequence (and every group inside it) must alternate operands and
/// binary operators. Evaluation must not nest deeper than [`MAX_DEPTH`].
/// For any input [`tokenize`] consumes completely, both functions produce
/// the same tokens.
///
/// # Errors
/// Returns the first [`ExpressionError`] found, with its byte position.
pub fn scan(text: &str) -> Result<Vec<Token>, ExpressionError> {
    scan_at(text, 0, 0, ExpressionError::Empty)
}

/// `depth` is the evaluation nesting already spent by enclosing sequences.
fn scan_at(
    text: &str,
    offset: usize,
    depth: usize,
    empty: ExpressionError,
) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut structure = Structure::new();
    let mut chained = 0;
    let mut pos = 0;

    while let Some(found) = text[pos..].chars().next() {
        let rest = &text[pos..];
        let position = offset + pos;
        let Some(lexeme) = next_lexeme(rest, Grouping::Balanced) else {
            return Err(unmatched(rest, found, position));
        };
        match lexeme.kind {
            LexemeKind::Skip => {}
            LexemeKind::Group => {
                structure.push(TokenKind::Group, position)?;
                let inner_depth = depth + chained + 1;
                if inner_depth > MAX_DEPTH {
                    return Err(ExpressionError::TooDeep { position });
                }
                let inner = scan_at(
                    lexeme.interior(),
                    position + 1,
                    inner_depth,
                    ExpressionError::EmptyGroup { position },
                )?;
                tokens.push(Token::Group(inner));
            }
            LexemeKind::Token(TokenKind::Id) => {
                structure.push(TokenKind::Id, position)?;
                tokens.push(Token::id(lexeme.text));
            }
            LexemeKind::Token(kind) => {
                structure.push(kind, position)?;
                if matches!(kind, TokenKind::Or | TokenKind::Imply | TokenKind::OnlyIf) {
                    chained += 1;
                    if depth + chained > MAX_DEPTH {
                        return Err(ExpressionError::TooDeep { position });
                    }
                }
                tokens.extend(Token::operator(kind));
            }
        }
        pos += lexeme.text.len();
    }

    structure.finish(empty)?;
    Ok(tokens)
}

/// Describe why nothing matched at `found`, the first character of `rest`.
fn unmatched(rest: &str, found: char, position: usize) -> ExpressionError {
    if found == '(' || found == ')' {
        return ExpressionError::UnbalancedParenthesis { position };
    }
    // A word that could not stand alone was cut off by a `>`; point at it.
    let word = identifier_len(rest);
    match rest[word..].chars().next() {
        Some(next) if word > 0 => ExpressionError::UnexpectedCharacter {
            position: position + word,
            found: next,
        },
        _ => ExpressionError::UnexpectedCharacter { position, found },
    }
}

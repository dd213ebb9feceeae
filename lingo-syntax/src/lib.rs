//! # Lingo's Query Tokenizer
//!
//! `lingo-syntax` breaks a free-form search string into [`Token`]s. A token is
//! either a simple term (`foo`, `"foo bar"`) or a compound term carrying an
//! alphanumeric modifier (`id: 42`, `posted:6/5/15-`). Nothing here knows what
//! a token *means*; that is decided by the parser chain in `lingo-search`.
//!
//! ## Grammar
//!
//! ```text
//! DELIMITER      = whitespace*
//! SIMPLE_TOKEN   = '"' [^"]+ '"' | graph+
//! MODIFIER       = [A-Za-z0-9]+
//! COMPOUND_TOKEN = (MODIFIER ':' DELIMITER)? SIMPLE_TOKEN
//! ```
//!
//! ## Example
//! ```
//! use lingo_syntax::Tokenizer;
//!
//! let mut tokenizer = Tokenizer::new(r#"foo bar: baz "froz quux""#);
//! let tokens: Vec<_> = tokenizer.by_ref().map(|token| token.to_string()).collect();
//! assert_eq!(tokens, ["foo", "bar: baz", "\"froz quux\""]);
//!
//! // rewinding starts the scan over
//! tokenizer.reset();
//! let first = tokenizer.next_token().unwrap();
//! assert_eq!(first.term(), "foo");
//! assert!(!first.is_compound());
//! ```

mod token;
mod tokenizer;

pub use regex::{Captures, Regex};
pub use token::Token;
pub use tokenizer::Tokenizer;

/// Byte lengths of a `MODIFIER ':' DELIMITER` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModifierPrefix {
    /// Length of the modifier itself.
    pub modifier: usize,
    /// Length of the modifier, the colon and any whitespace that follows.
    pub len: usize,
}

pub(crate) fn is_graph(ch: char) -> bool {
    !ch.is_whitespace() && !ch.is_control()
}

/// Matches `MODIFIER ':' DELIMITER` at the start of `input`.
pub(crate) fn scan_modifier_prefix(input: &str) -> Option<ModifierPrefix> {
    let modifier = input
        .bytes()
        .take_while(|byte| byte.is_ascii_alphanumeric())
        .count();
    if modifier == 0 {
        return None;
    }
    let rest = input[modifier..].strip_prefix(':')?;
    let spaces = rest.len() - rest.trim_start().len();
    Some(ModifierPrefix {
        modifier,
        len: modifier + 1 + spaces,
    })
}

/// Matches `SIMPLE_TOKEN` at the start of `input`, returning its byte length.
///
/// A quoted span needs at least one character between the quotes; `""` and an
/// unterminated `"foo` fall back to the bare graph run.
pub(crate) fn scan_simple(input: &str) -> Option<usize> {
    if let Some(rest) = input.strip_prefix('"') {
        if let Some(close) = rest.find('"') {
            if close > 0 {
                return Some(close + 2);
            }
        }
    }

    let len: usize = input
        .chars()
        .take_while(|&ch| is_graph(ch))
        .map(char::len_utf8)
        .sum();
    (len > 0).then_some(len)
}

/// Matches `COMPOUND_TOKEN` at the start of `input`, returning its byte length.
pub(crate) fn scan_compound(input: &str) -> Option<usize> {
    // A dangling `foo:` has no term to attach to, so it is rescanned as a
    // plain graph run.
    if let Some(prefix) = scan_modifier_prefix(input) {
        if let Some(len) = scan_simple(&input[prefix.len..]) {
            return Some(prefix.len + len);
        }
    }
    scan_simple(input)
}

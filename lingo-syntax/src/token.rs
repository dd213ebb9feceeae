use crate::scan_modifier_prefix;
use regex::{Captures, Regex};
use std::{fmt, ops::Range};

/// A single unit of a query string: an optional modifier plus a term.
///
/// The modifier is one or more ASCII alphanumerics followed by a colon; the
/// term is whatever follows, with surrounding double quotes removed.
///
/// ```
/// use lingo_syntax::Token;
///
/// let token = Token::new("foo: \"bar baz\"");
/// assert_eq!(token.modifier(), Some("foo"));
/// assert_eq!(token.term(), "bar baz");
/// assert!(token.is_compound());
///
/// // quoting the whole thing makes it a plain term
/// let token = Token::new("\"foo: bar\"");
/// assert_eq!(token.modifier(), None);
/// assert_eq!(token.term(), "foo: bar");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    raw: String,
    modifier: Option<Range<usize>>,
    term: Range<usize>,
}

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        // `foo:` alone is a term, not a modifier with nothing attached.
        let (modifier, term_start) = match scan_modifier_prefix(&raw) {
            Some(prefix) if prefix.len < raw.len() => (Some(0..prefix.modifier), prefix.len),
            _ => (None, 0),
        };
        let (start, end) = unquote(&raw[term_start..]);
        Self {
            modifier,
            term: term_start + start..term_start + end,
            raw,
        }
    }

    /// The original, undecomposed text of the token.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn modifier(&self) -> Option<&str> {
        self.modifier.clone().map(|range| &self.raw[range])
    }

    pub fn term(&self) -> &str {
        &self.raw[self.term.clone()]
    }

    /// `true` when the token carries a non-empty modifier.
    pub fn is_compound(&self) -> bool {
        self.modifier().is_some_and(|modifier| !modifier.is_empty())
    }

    /// Runs `pattern` against the raw text of the token.
    pub fn captures(&self, pattern: &Regex) -> Option<Captures<'_>> {
        pattern.captures(&self.raw)
    }

    /// Runs `pattern` against the raw text and hands the captures to `f`.
    ///
    /// Custom parsers use this to apply their own prefix conventions instead of
    /// relying on [`Token::modifier`].
    ///
    /// ```
    /// use lingo_syntax::{Regex, Token};
    ///
    /// let id = Regex::new(r"\Aid:\s*(\d+)\z").unwrap();
    /// let token = Token::new("id: 42");
    /// assert_eq!(token.match_with(&id, |caps| caps[1].parse::<u32>().ok()).flatten(), Some(42));
    /// assert_eq!(Token::new("42").match_with(&id, |_| ()), None);
    /// ```
    pub fn match_with<R>(&self, pattern: &Regex, f: impl FnOnce(&Captures<'_>) -> R) -> Option<R> {
        self.captures(pattern).map(|caps| f(&caps))
    }
}

/// Byte offsets of `text` with surrounding quotes removed.
///
/// A lone leading or trailing quote is stripped as well, as long as something
/// remains of the term.
fn unquote(text: &str) -> (usize, usize) {
    let len = text.len();
    let opens = text.starts_with('"');
    let closes = text.ends_with('"');
    if len < 2 {
        return (0, len);
    }
    match (opens, closes) {
        (true, true) => (1, len - 1),
        (true, false) => (1, len),
        (false, true) => (0, len - 1),
        (false, false) => (0, len),
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("raw", &self.raw)
            .field("modifier", &self.modifier())
            .field("term", &self.term())
            .finish()
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_token() {
        let token = Token::new("foo");
        assert_eq!(token.modifier(), None);
        assert_eq!(token.term(), "foo");
        assert!(!token.is_compound());
    }

    #[test]
    fn simple_quoted_token() {
        let token = Token::new("\"foo bar\"");
        assert_eq!(token.modifier(), None);
        assert_eq!(token.term(), "foo bar");
    }

    #[test]
    fn empty_quoted_token() {
        let token = Token::new("\"\"");
        assert_eq!(token.modifier(), None);
        assert_eq!(token.term(), "");
    }

    #[test]
    fn compound_token() {
        let token = Token::new("foo: bar");
        assert_eq!(token.modifier(), Some("foo"));
        assert_eq!(token.term(), "bar");
        assert!(token.is_compound());
    }

    #[test]
    fn compound_token_with_empty_quoted_term() {
        let token = Token::new("foo: \"\"");
        assert_eq!(token.modifier(), Some("foo"));
        assert_eq!(token.term(), "");
    }

    #[test]
    fn unbalanced_quotes_are_trimmed() {
        assert_eq!(Token::new("\"foo").term(), "foo");
        assert_eq!(Token::new("foo\"").term(), "foo");
        assert_eq!(Token::new("\"").term(), "\"");
    }

    #[test]
    fn debug_shows_decomposition() {
        let debug = format!("{:?}", Token::new("foo: bar"));
        assert_eq!(
            debug,
            r#"Token { raw: "foo: bar", modifier: Some("foo"), term: "bar" }"#
        );
    }

    #[test]
    fn display_is_the_raw_text() {
        assert_eq!(Token::new("foo:  \"bar\"").to_string(), "foo:  \"bar\"");
    }
}

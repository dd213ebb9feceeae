use crate::{Token, scan_compound, scan_simple};
use std::iter::FusedIterator;

/// One-shot scanner over a query string.
///
/// The cursor only moves forward, except for [`Tokenizer::reset`] and
/// [`Tokenizer::simplify`].
#[derive(Debug, Clone)]
pub struct Tokenizer<'q> {
    query: &'q str,
    pos: usize,
    // Start of the most recently returned token, for `simplify`.
    last: Option<usize>,
}

impl<'q> Tokenizer<'q> {
    pub fn new(query: &'q str) -> Self {
        Self {
            query: query.trim(),
            pos: 0,
            last: None,
        }
    }

    /// Returns the next token, or `None` once the input is exhausted.
    ///
    /// Scanning also stops early at the first character that can not start a
    /// token (e.g. a control character).
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_delimiter();
        let len = scan_compound(self.remaining())?;
        Some(self.take(len))
    }

    /// Rewinds to the start of the query.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.last = None;
    }

    /// Rescans the most recent token using the simple-token grammar only.
    ///
    /// For `foo: bar` this yields `foo:` and leaves `bar` for the next call to
    /// [`Tokenizer::next_token`]. For a token without a modifier the same text
    /// comes back. Returns `None` if no token has been produced yet.
    pub fn simplify(&mut self) -> Option<Token> {
        self.pos = self.last?;
        let len = scan_simple(self.remaining())?;
        Some(self.take(len))
    }

    /// Byte offset of the cursor within the trimmed query.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn query(&self) -> &'q str {
        self.query
    }

    fn take(&mut self, len: usize) -> Token {
        let start = self.pos;
        self.pos += len;
        self.last = Some(start);
        Token::new(&self.query[start..self.pos])
    }

    fn remaining(&self) -> &'q str {
        &self.query[self.pos..]
    }

    fn skip_delimiter(&mut self) {
        let rest = self.remaining();
        self.pos += rest.len() - rest.trim_start().len();
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

impl FusedIterator for Tokenizer<'_> {}

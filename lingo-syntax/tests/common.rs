#![allow(dead_code)]
//! Shared helpers for `lingo-syntax` integration tests.

use lingo_syntax::*;

pub fn tokens(query: &str) -> Vec<String> {
    Tokenizer::new(query).map(|token| token.to_string()).collect()
}

pub fn terms(query: &str) -> Vec<String> {
    Tokenizer::new(query)
        .map(|token| token.term().to_string())
        .collect()
}

pub fn next_is(tokenizer: &mut Tokenizer<'_>, expected: &str) -> Token {
    match tokenizer.next_token() {
        Some(token) => {
            assert_eq!(token.as_str(), expected);
            token
        }
        None => panic!("expected token {expected:?}, got end of input"),
    }
}

pub fn assert_exhausted(tokenizer: &mut Tokenizer<'_>) {
    if let Some(token) = tokenizer.next_token() {
        panic!("expected end of input, got: {token:?}");
    }
}

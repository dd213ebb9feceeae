#![allow(dead_code)]

use jiff::civil::{Date, date};
use lingo::{FilterChain, Search};

pub const REFERENCE: Date = date(2016, 1, 1);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Compiles `query` from an empty chain and renders each condition.
pub fn compile(search: &Search<FilterChain>, query: &str) -> Vec<String> {
    search
        .compile(query, FilterChain::new())
        .unwrap_or_else(|err| panic!("{query:?} failed: {err}"))
        .conditions()
        .iter()
        .map(ToString::to_string)
        .collect()
}

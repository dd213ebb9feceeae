//! Search query compiler.
//!
//! `lingo` turns free-form search strings such as
//! `6/4/15-6/5/15 id: 42 "foo bar"` into a chain of filter conditions. The
//! pieces live in their own crates and are re-exported here:
//!
//! - [`lingo_syntax`]: the tokenizer.
//! - [`lingo_search`]: the parser chain, date parsers and `M/D[/Y]` resolver.
//! - [`plan`]: [`FilterChain`], a ready-made scope for embedders that do not
//!   bring their own query builder.
//! - [`demo`]: a few complete search definitions built on [`FilterChain`].

pub mod demo;
pub mod plan;

pub use lingo_search::*;
pub use lingo_syntax;
pub use plan::{Column, CompareOp, Condition, FilterChain};

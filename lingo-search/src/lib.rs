//! The parser chain behind lingo queries.
//!
//! A [`Search`] owns an ordered list of [`Parser`]s. Compiling a query folds
//! every token into a caller-owned scope: the first parser that claims a token
//! refines the scope, and tokens nobody claims go to the definition's default
//! parser. What the scope *is* (a SQL builder, a filter list, ...) is entirely
//! up to the parsers.
//!
//! [`DateParser`] is the stock parser for US `M/D[/Y]` dates, ranges and open
//! bounds; [`mdy`] holds the underlying calendar resolver.

mod date;
mod error;
pub mod mdy;
mod parser;
mod search;

pub use date::{
    AnsiQuoting, ColumnRef, DateComparison, DateCondition, DateParser, DateScope,
    LiteralCondition, Quoting,
};
pub use error::{RegistrationError, Result, SearchError};
pub use lingo_syntax::{Token, Tokenizer};
pub use parser::{BoxedParser, Parser, ParserRegistry};
pub use search::{Diagnostic, Search, SearchBuilder, SearchRun};

#![allow(dead_code)]
//! Shared fixtures for `lingo-search` integration tests.

use jiff::civil::Date;
use lingo_search::*;

/// A table-qualified field, enough to exercise literal quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub table: &'static str,
    pub column: &'static str,
}

impl ColumnRef for Field {
    fn table(&self) -> &str {
        self.table
    }

    fn column(&self) -> &str {
        self.column
    }
}

pub const JOBS_DATE: Field = Field {
    table: "jobs",
    column: "date",
};

/// Records everything parsers do to it, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    pub steps: Vec<String>,
    pub dates: Vec<DateCondition<Field>>,
}

impl Recorder {
    pub fn with(&self, step: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.steps.push(step.into());
        next
    }

    pub fn only_date(&self) -> &DateCondition<Field> {
        assert_eq!(self.dates.len(), 1, "expected a single date condition: {self:?}");
        &self.dates[0]
    }
}

impl DateScope<Field> for Recorder {
    fn where_date(mut self, condition: DateCondition<Field>) -> Self {
        self.steps.push(format!("{} {}", condition.field.column, condition.comparison));
        self.dates.push(condition);
        self
    }
}

pub fn date_parser(reference: Date) -> DateParser<Field, Recorder> {
    DateParser::new(JOBS_DATE).relative_to(reference)
}

/// Runs a single date parser over one raw token.
pub fn parse_with(parser: &DateParser<Field, Recorder>, raw: &str) -> Option<Recorder> {
    parser.parse(&Token::new(raw), &Recorder::default())
}

pub fn comparison(parser: &DateParser<Field, Recorder>, raw: &str) -> Option<DateComparison> {
    parse_with(parser, raw).map(|scope| scope.only_date().comparison)
}

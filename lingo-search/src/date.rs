//! Date-expression parsers.
//!
//! A [`DateParser`] recognizes four shapes of US dates (see [`crate::mdy`]):
//!
//! | token        | condition                 |
//! |--------------|---------------------------|
//! | `7/4`        | field = 7/4               |
//! | `7/1-7/31`   | field between both dates  |
//! | `-7/31`      | field on or before 7/31   |
//! | `7/1-`       | field on or after 7/1     |
//!
//! With a modifier configured (`posted: 7/1-`) the prefix is mandatory and
//! unprefixed tokens are ignored.

use crate::{mdy::Mdy, parser::Parser};
use jiff::{ToSpan, civil::Date};
use lingo_syntax::Token;
use serde::Serialize;
use std::{borrow::Cow, fmt};
use tracing::trace;

/// How a date field is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateComparison {
    On(Date),
    /// Inclusive on both ends.
    Within { start: Date, end: Date },
    OnOrBefore(Date),
    OnOrAfter(Date),
}

impl DateComparison {
    /// Renders the comparison as a SQL fragment with `?` placeholders.
    ///
    /// ```
    /// use jiff::civil::date;
    /// use lingo_search::{AnsiQuoting, ColumnRef, DateComparison};
    ///
    /// struct PostDate;
    /// impl ColumnRef for PostDate {
    ///     fn table(&self) -> &str { "receipts" }
    ///     fn column(&self) -> &str { "post_date" }
    /// }
    ///
    /// let literal = DateComparison::OnOrAfter(date(2015, 6, 5)).to_literal(&PostDate, &AnsiQuoting);
    /// assert_eq!(literal.sql, r#""receipts"."post_date" >= ?"#);
    /// assert_eq!(literal.binds, [date(2015, 6, 5)]);
    /// ```
    pub fn to_literal(&self, field: &impl ColumnRef, quoting: &dyn Quoting) -> LiteralCondition {
        let column = format!(
            "{}.{}",
            quoting.quote_identifier(field.table()),
            quoting.quote_field(field.column())
        );
        let (operator, binds) = match *self {
            DateComparison::On(date) => ("= ?", vec![date]),
            DateComparison::Within { start, end } => ("BETWEEN ? AND ?", vec![start, end]),
            DateComparison::OnOrBefore(date) => ("<= ?", vec![date]),
            DateComparison::OnOrAfter(date) => (">= ?", vec![date]),
        };
        LiteralCondition {
            sql: format!("{column} {operator}"),
            binds,
        }
    }
}

impl fmt::Display for DateComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateComparison::On(date) => write!(f, "= {date}"),
            DateComparison::Within { start, end } => write!(f, "in [{start}, {end}]"),
            DateComparison::OnOrBefore(date) => write!(f, "<= {date}"),
            DateComparison::OnOrAfter(date) => write!(f, ">= {date}"),
        }
    }
}

/// A pre-rendered comparison for scopes that take raw SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralCondition {
    pub sql: String,
    pub binds: Vec<Date>,
}

/// The comparison a [`DateParser`] hands to its scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCondition<F> {
    pub field: F,
    pub comparison: DateComparison,
    /// Present when the parser was configured with a [`Quoting`] service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<LiteralCondition>,
}

/// Scopes that can be narrowed by a date condition.
pub trait DateScope<F>: Sized {
    fn where_date(self, condition: DateCondition<F>) -> Self;
}

/// A field that lives in a named table, so it can be quoted for SQL.
pub trait ColumnRef {
    fn table(&self) -> &str;
    fn column(&self) -> &str;
}

/// Connection-specific identifier quoting.
pub trait Quoting: Send + Sync {
    fn quote_identifier(&self, name: &str) -> String;
    fn quote_field(&self, name: &str) -> String;
}

/// Standard SQL double-quote quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiQuoting;

impl Quoting for AnsiQuoting {
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn quote_field(&self, name: &str) -> String {
        self.quote_identifier(name)
    }
}

type Decorator<A> = Box<dyn Fn(&A) -> A + Send + Sync>;
type LiteralBuilder<F> = Box<dyn Fn(&F, &DateComparison) -> LiteralCondition + Send + Sync>;

/// Parses single dates, closed ranges and open-ended ranges against one field.
pub struct DateParser<F, A> {
    field: F,
    modifier: Option<String>,
    reference: Option<Date>,
    decorator: Option<Decorator<A>>,
    literal: Option<LiteralBuilder<F>>,
}

impl<F, A> DateParser<F, A> {
    pub fn new(field: F) -> Self {
        Self {
            field,
            modifier: None,
            reference: None,
            decorator: None,
            literal: None,
        }
    }

    /// Only accept tokens written as `<modifier>: <date expression>`.
    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    /// Pins the date used to infer omitted years. Defaults to today.
    pub fn relative_to(mut self, reference: Date) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Applied to the scope before the condition, and only when a token
    /// matched (e.g. to add a join the field depends on).
    pub fn decorator(mut self, decorator: impl Fn(&A) -> A + Send + Sync + 'static) -> Self {
        self.decorator = Some(Box::new(decorator));
        self
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn prefix(&self) -> Option<&str> {
        self.modifier.as_deref()
    }

    /// Recognizes `token` without touching any scope.
    pub fn parse_comparison(&self, token: &Token) -> Option<DateComparison> {
        let expression = self.strip_prefix(token.as_str())?;
        let pattern = DatePattern::scan(expression)?;
        let reference = self.reference.unwrap_or_else(crate::mdy::today);
        let comparison = pattern.resolve(reference);
        if comparison.is_none() {
            trace!(token = %token, "date expression is not a calendar date");
        }
        comparison
    }

    fn strip_prefix<'t>(&self, raw: &'t str) -> Option<&'t str> {
        match &self.modifier {
            None => Some(raw),
            Some(modifier) => {
                let rest = raw.strip_prefix(modifier.as_str())?.strip_prefix(':')?;
                Some(rest.trim_start())
            }
        }
    }
}

impl<F: ColumnRef, A> DateParser<F, A> {
    /// Attach a SQL rendering of every condition, quoted with `quoting`.
    pub fn with_quoting(mut self, quoting: impl Quoting + 'static) -> Self {
        self.literal = Some(Box::new(move |field: &F, comparison: &DateComparison| {
            comparison.to_literal(field, &quoting)
        }));
        self
    }
}

impl<F, A> Parser<A> for DateParser<F, A>
where
    F: Clone + fmt::Debug + Send + Sync,
    A: DateScope<F> + Clone,
{
    fn parse(&self, token: &Token, scope: &A) -> Option<A> {
        let comparison = self.parse_comparison(token)?;
        let literal = self
            .literal
            .as_ref()
            .map(|render| render(&self.field, &comparison));
        let scope = match &self.decorator {
            Some(decorate) => decorate(scope),
            None => scope.clone(),
        };
        Some(scope.where_date(DateCondition {
            field: self.field.clone(),
            comparison,
            literal,
        }))
    }

    fn describe(&self) -> Cow<'_, str> {
        Cow::Owned(format!(
            "DateParser {{ modifier: {:?}, field: {:?} }}",
            self.modifier, self.field
        ))
    }
}

impl<F: fmt::Debug, A> fmt::Debug for DateParser<F, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateParser")
            .field("field", &self.field)
            .field("modifier", &self.modifier)
            .field("reference", &self.reference)
            .field("decorated", &self.decorator.is_some())
            .field("literal", &self.literal.is_some())
            .finish()
    }
}

/// The four token shapes, in priority order. A shape that matches but does not
/// name a real date ends the attempt; later shapes are not tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePattern {
    Single(Mdy),
    Range(Mdy, Mdy),
    UpTo(Mdy),
    From(Mdy),
}

impl DatePattern {
    fn scan(expression: &str) -> Option<Self> {
        if let Some(date) = Mdy::scan(expression) {
            return Some(DatePattern::Single(date));
        }

        // `M/D[/Y]` never contains a hyphen, so the first one splits the
        // expression unambiguously.
        let (low, high) = expression.split_once('-')?;
        match (low.is_empty(), high.is_empty()) {
            (false, false) => Some(DatePattern::Range(Mdy::scan(low)?, Mdy::scan(high)?)),
            (true, false) => Some(DatePattern::UpTo(Mdy::scan(high)?)),
            (false, true) => Some(DatePattern::From(Mdy::scan(low)?)),
            (true, true) => None,
        }
    }

    fn resolve(self, reference: Date) -> Option<DateComparison> {
        match self {
            DatePattern::Single(date) => Some(DateComparison::On(date.resolve(reference)?)),
            DatePattern::Range(low, high) => {
                let start = low.resolve(reference)?;
                // Anchoring the upper bound a year past the lower bound lets
                // `12/1-1/31` span New Year without explicit years.
                let anchor = start.checked_add(1.year()).ok()?;
                let end = high.resolve(anchor)?;
                Some(DateComparison::Within { start, end })
            }
            DatePattern::UpTo(date) => Some(DateComparison::OnOrBefore(date.resolve(reference)?)),
            DatePattern::From(date) => Some(DateComparison::OnOrAfter(date.resolve(reference)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn comparison(expression: &str, reference: Date) -> Option<DateComparison> {
        DatePattern::scan(expression)?.resolve(reference)
    }

    #[test]
    fn shapes_are_exclusive() {
        assert!(matches!(DatePattern::scan("7/4"), Some(DatePattern::Single(_))));
        assert!(matches!(DatePattern::scan("7/1-7/31"), Some(DatePattern::Range(..))));
        assert!(matches!(DatePattern::scan("-7/31"), Some(DatePattern::UpTo(_))));
        assert!(matches!(DatePattern::scan("7/1-"), Some(DatePattern::From(_))));
        assert_eq!(DatePattern::scan("-"), None);
        assert_eq!(DatePattern::scan("7/1--"), None);
        assert_eq!(DatePattern::scan("7/1-7/2-7/3"), None);
        assert_eq!(DatePattern::scan("bogus-"), None);
    }

    #[test]
    fn range_spanning_new_year() {
        assert_eq!(
            comparison("12/1-1/31", date(1776, 7, 4)),
            Some(DateComparison::Within {
                start: date(1775, 12, 1),
                end: date(1776, 1, 31),
            })
        );
    }

    #[test]
    fn leap_day_anchor_is_clamped() {
        // 2/29/2016 + 1 year = 2/28/2017, so 2/28 resolves into 2017 and 3/1
        // falls back into 2016.
        assert_eq!(
            comparison("2/29/2016-2/28", date(1999, 1, 1)),
            Some(DateComparison::Within {
                start: date(2016, 2, 29),
                end: date(2017, 2, 28),
            })
        );
        assert_eq!(
            comparison("2/29/2016-3/1", date(1999, 1, 1)),
            Some(DateComparison::Within {
                start: date(2016, 2, 29),
                end: date(2016, 3, 1),
            })
        );
    }

    #[test]
    fn ansi_quoting_doubles_embedded_quotes() {
        assert_eq!(AnsiQuoting.quote_identifier("odd\"name"), "\"odd\"\"name\"");
        assert_eq!(AnsiQuoting.quote_field("date"), "\"date\"");
    }

    #[test]
    fn display_is_readable() {
        let within = DateComparison::Within {
            start: date(2015, 6, 4),
            end: date(2015, 6, 5),
        };
        assert_eq!(within.to_string(), "in [2015-06-04, 2015-06-05]");
        assert_eq!(DateComparison::OnOrBefore(date(2015, 6, 4)).to_string(), "<= 2015-06-04");
    }
}

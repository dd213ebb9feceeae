//! Ready-made search definitions over [`FilterChain`].
//!
//! Each constructor takes the reference date used for dates typed without a
//! year; `None` means today.

use crate::plan::{Column, CompareOp, Condition, FilterChain};
use jiff::civil::Date;
use lingo_search::{AnsiQuoting, DateParser, Search, mdy};
use lingo_syntax::{Regex, Token};
use once_cell::sync::Lazy;
use tracing::trace;

pub const JOB_DATE: Column = Column::new("jobs", "date");
pub const JOB_ID: Column = Column::new("jobs", "id");
pub const JOB_NAME: Column = Column::new("jobs", "name");

pub const RECEIPT_CHECK_DATE: Column = Column::new("receipts", "check_date");
pub const RECEIPT_POST_DATE: Column = Column::new("receipts", "post_date");
pub const RECEIPT_AMOUNT: Column = Column::new("receipts", "amount");
pub const RECEIPT_CHECK_NO: Column = Column::new("receipts", "check_no");

pub const TASK_NAME: Column = Column::new("tasks", "name");
pub const TASK_PRIORITY: Column = Column::new("tasks", "priority");
pub const TASK_DUE_DATE: Column = Column::new("tasks", "due_date");
pub const CATEGORY_NAME: Column = Column::new("categories", "name");

static ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\Aid:\s*(\d+)\z").unwrap());
static AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\Aamount: (\d+(?:\.\d+)?)\z").unwrap());
static PRIORITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\Aprio([<=>])(\d+)\z").unwrap());
static DUE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A(?<m>\d{1,2})/(?<d>\d{1,2})/(?<y>\d{2}(?:\d{2})?)\z").unwrap());

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 3] = ["jobs", "receipts", "tasks"];

pub fn by_name(name: &str, reference: Option<Date>) -> Option<Search<FilterChain>> {
    match name {
        "jobs" => Some(jobs(reference)),
        "receipts" => Some(receipts(reference)),
        "tasks" => Some(tasks()),
        _ => None,
    }
}

/// Dates on `jobs.date`, `id: N`, and a substring match on the name.
pub fn jobs(reference: Option<Date>) -> Search<FilterChain> {
    Search::builder("JobSearch")
        .parser(date_parser(JOB_DATE, reference))
        .parser_fn(|token, chain| {
            token.match_with(&ID, |caps| {
                chain.where_(Condition::Eq {
                    column: JOB_ID,
                    value: caps[1].to_string(),
                })
            })
        })
        .default_parse(|token, chain| {
            chain.where_(Condition::Matches {
                column: JOB_NAME,
                pattern: format!("%{}%", token.term()),
            })
        })
        .build()
}

/// Check dates unprefixed, post dates behind `posted:` rendered as quoted SQL,
/// `amount: N[.NN]`, and the check number as the fallback.
pub fn receipts(reference: Option<Date>) -> Search<FilterChain> {
    Search::builder("ReceiptSearch")
        .parser(date_parser(RECEIPT_CHECK_DATE, reference))
        .parser(
            date_parser(RECEIPT_POST_DATE, reference)
                .modifier("posted")
                .with_quoting(AnsiQuoting),
        )
        .parser_fn(|token, chain| {
            token.match_with(&AMOUNT, |caps| {
                chain.where_(Condition::Eq {
                    column: RECEIPT_AMOUNT,
                    value: caps[1].to_string(),
                })
            })
        })
        .default_parse(|token, chain| {
            chain.where_(Condition::Matches {
                column: RECEIPT_CHECK_NO,
                pattern: token.to_string(),
            })
        })
        .build()
}

/// `cat: name` (joins categories), `prio<N` / `prio>N` / `prio=N`, fully
/// dated due dates, and a substring match on the name.
pub fn tasks() -> Search<FilterChain> {
    Search::builder("TaskSearch")
        .parser_fn(category)
        .parser_fn(|token, chain| {
            token
                .match_with(&PRIORITY, |caps| {
                    let op = CompareOp::from_symbol(&caps[1])?;
                    Some(chain.where_(Condition::Compare {
                        column: TASK_PRIORITY,
                        op,
                        value: caps[2].to_string(),
                    }))
                })
                .flatten()
        })
        .parser_fn(due_date)
        .default_parse(|token, chain| {
            chain.where_(Condition::Matches {
                column: TASK_NAME,
                pattern: format!("%{}%", token.term()),
            })
        })
        .build()
}

fn date_parser(field: Column, reference: Option<Date>) -> DateParser<Column, FilterChain> {
    let parser = DateParser::new(field);
    match reference {
        Some(reference) => parser.relative_to(reference),
        None => parser,
    }
}

fn category(token: &Token, chain: &FilterChain) -> Option<FilterChain> {
    if token.modifier()? != "cat" {
        return None;
    }
    Some(chain.join("categories").where_(Condition::Eq {
        column: CATEGORY_NAME,
        value: token.term().to_string(),
    }))
}

fn due_date(token: &Token, chain: &FilterChain) -> Option<FilterChain> {
    let date = token
        .match_with(&DUE_DATE, |caps| {
            let year: i16 = caps["y"].parse().ok()?;
            let year = if caps["y"].len() == 2 {
                mdy::expand_two_digit_year(year as u8)
            } else {
                year
            };
            Date::new(year, caps["m"].parse().ok()?, caps["d"].parse().ok()?).ok()
        })
        .flatten();
    if date.is_none() {
        trace!(token = %token, "not a due date");
    }
    Some(chain.where_(Condition::Eq {
        column: TASK_DUE_DATE,
        value: date?.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_builds() {
        for name in NAMES {
            let search = by_name(name, None).unwrap();
            assert!(!search.parsers().is_empty(), "{name}");
        }
        assert!(by_name("nope", None).is_none());
    }

    #[test]
    fn due_date_requires_a_year() {
        let chain = FilterChain::new();
        assert!(due_date(&Token::new("7/4"), &chain).is_none());
        assert!(due_date(&Token::new("2/30/2016"), &chain).is_none());
        let chain = due_date(&Token::new("7/4/17"), &chain).unwrap();
        assert_eq!(
            chain.conditions(),
            [Condition::Eq {
                column: TASK_DUE_DATE,
                value: "2017-07-04".into(),
            }]
        );
    }
}

//! An in-memory scope: an ordered list of filter conditions.

use lingo_search::{ColumnRef, DateCondition, DateScope};
use serde::Serialize;
use std::fmt;

/// A column qualified by its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Column {
    pub table: &'static str,
    pub name: &'static str,
}

impl Column {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Self { table, name }
    }
}

impl ColumnRef for Column {
    fn table(&self) -> &str {
        self.table
    }

    fn column(&self) -> &str {
        self.name
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompareOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "=")]
    Eq,
}

impl CompareOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(CompareOp::Lt),
            ">" => Some(CompareOp::Gt),
            "=" => Some(CompareOp::Eq),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Eq => "=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Date(DateCondition<Column>),
    Eq {
        column: Column,
        value: String,
    },
    Compare {
        column: Column,
        op: CompareOp,
        value: String,
    },
    /// SQL `LIKE`; `pattern` carries its own wildcards.
    Matches {
        column: Column,
        pattern: String,
    },
    Join {
        table: &'static str,
    },
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Date(condition) => {
                write!(f, "{} {}", condition.field, condition.comparison)?;
                if let Some(literal) = &condition.literal {
                    write!(f, " ({})", literal.sql)?;
                }
                Ok(())
            }
            Condition::Eq { column, value } => write!(f, "{column} = {value:?}"),
            Condition::Compare { column, op, value } => {
                write!(f, "{column} {} {value}", op.symbol())
            }
            Condition::Matches { column, pattern } => write!(f, "{column} LIKE {pattern:?}"),
            Condition::Join { table } => write!(f, "JOIN {table}"),
        }
    }
}

/// Conditions in the order parsers added them.
///
/// Parsers receive the chain by reference, so the builder methods return a
/// new chain and leave `self` untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterChain {
    conditions: Vec<Condition>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_(&self, condition: Condition) -> Self {
        let mut next = self.clone();
        next.conditions.push(condition);
        next
    }

    /// Adds a join on `table` unless the chain already has one.
    pub fn join(&self, table: &'static str) -> Self {
        if self.joins(table) {
            return self.clone();
        }
        self.where_(Condition::Join { table })
    }

    pub fn joins(&self, table: &str) -> bool {
        self.conditions
            .iter()
            .any(|condition| matches!(condition, Condition::Join { table: joined } if *joined == table))
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl DateScope<Column> for FilterChain {
    fn where_date(mut self, condition: DateCondition<Column>) -> Self {
        self.conditions.push(Condition::Date(condition));
        self
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{i}] {condition}")?;
        }
        Ok(())
    }
}

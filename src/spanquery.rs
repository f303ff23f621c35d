/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`SpanQuery`] plan that is handed to the execution engine,
//! along with the leaf predicate factories the grammar uses to build word conditions.

use regex::Regex;
use sealed::sealed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::CqlError;
use crate::json::{FromJson, ToJson};
use crate::types::*;

/// Comparison operators for numeric operator atoms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Equal,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }
}

impl TryFrom<&str> for Comparison {
    type Error = CqlError;
    fn try_from(val: &str) -> Result<Self, Self::Error> {
        match val {
            "=" | "==" => Ok(Self::Equal),
            "<" => Ok(Self::Less),
            "<=" => Ok(Self::LessOrEqual),
            ">" => Ok(Self::Greater),
            ">=" => Ok(Self::GreaterOrEqual),
            _ => Err(CqlError::SerializationError(format!(
                "Expected comparison operator (=, <, <=, >, >=), got {}",
                val
            ))),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the span query plan. Leaves match tokens at index positions, the other
/// nodes combine spans. This is consumed by the execution engine, this library never evaluates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum SpanQuery {
    /// Exact match of an annotation value
    Term {
        field: String,
        prefix: String,
        value: String,
    },
    /// Any token carrying an annotation with this prefix, regardless of its value
    Prefix { field: String, prefix: String },
    Wildcard {
        field: String,
        prefix: String,
        value: String,
    },
    Regexp {
        field: String,
        prefix: String,
        value: String,
    },
    /// A variable reference, already expanded to its values
    Variable {
        field: String,
        prefix: String,
        name: String,
        values: Vec<String>,
    },
    /// Numeric comparison against an annotation value
    Operator {
        field: String,
        prefix: String,
        operator: Comparison,
        value: i64,
    },
    /// Token positions within a range (inclusive)
    Position {
        field: String,
        start: usize,
        end: usize,
    },
    /// Matches every token
    All { field: String },
    And { clauses: Vec<SpanQuery> },
    Or { clauses: Vec<SpanQuery> },
    /// Spans of `base` that are not matched by `exclude`
    Not {
        base: Box<SpanQuery>,
        exclude: Box<SpanQuery>,
    },
    Sequence {
        items: Vec<SequenceItem>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ignore: Option<Arc<IgnoreClause>>,
    },
    Recurrence {
        query: Box<SpanQuery>,
        min: usize,
        max: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ignore: Option<Arc<IgnoreClause>>,
    },
    /// Zero-width span at the start of each match
    Start { query: Box<SpanQuery> },
    /// Zero-width span at the end of each match
    End { query: Box<SpanQuery> },
}

/// An element of a sequence, possibly optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceItem {
    query: SpanQuery,
    #[serde(default)]
    optional: bool,
}

/// Content that may be silently skipped between sequence elements and recurrences.
/// One instance is shared (read-only) by all sequence and recurrence nodes of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoreClause {
    query: SpanQuery,
    max_skip_length: usize,
}

impl SpanQuery {
    pub fn term(
        field: impl Into<String>,
        prefix: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Term {
            field: field.into(),
            prefix: prefix.into(),
            value: value.into(),
        }
    }

    pub fn prefix(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::Prefix {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    pub fn wildcard(
        field: impl Into<String>,
        prefix: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Wildcard {
            field: field.into(),
            prefix: prefix.into(),
            value: value.into(),
        }
    }

    /// Instantiates a regular expression atom. The expression is compiled once to reject
    /// malformed patterns early; the execution engine does the actual matching.
    pub fn regexp(
        field: impl Into<String>,
        prefix: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, CqlError> {
        let value: String = value.into();
        if let Err(e) = Regex::new(&format!("^(?:{})$", value)) {
            return Err(CqlError::RegexError(
                value,
                e.to_string(),
                "SpanQuery::regexp",
            ));
        }
        Ok(Self::Regexp {
            field: field.into(),
            prefix: prefix.into(),
            value,
        })
    }

    pub fn operator(
        field: impl Into<String>,
        prefix: impl Into<String>,
        operator: Comparison,
        value: i64,
    ) -> Self {
        Self::Operator {
            field: field.into(),
            prefix: prefix.into(),
            operator,
            value,
        }
    }

    pub fn position(field: impl Into<String>, start: usize, end: usize) -> Result<Self, CqlError> {
        if start > end {
            return Err(CqlError::IllegalPosition(
                start,
                end,
                "SpanQuery::position",
            ));
        }
        Ok(Self::Position {
            field: field.into(),
            start,
            end,
        })
    }

    /// The match-all query
    pub fn all(field: impl Into<String>) -> Self {
        Self::All {
            field: field.into(),
        }
    }

    pub fn not(base: SpanQuery, exclude: SpanQuery) -> Self {
        Self::Not {
            base: Box::new(base),
            exclude: Box::new(exclude),
        }
    }

    /// Combines clauses with the given combinator, a single clause is returned as is
    pub fn combine(combinator: Combinator, mut clauses: Vec<SpanQuery>) -> Self {
        if clauses.len() == 1 {
            if let Some(clause) = clauses.pop() {
                return clause;
            }
        }
        match combinator {
            Combinator::And => Self::And { clauses },
            Combinator::Or => Self::Or { clauses },
        }
    }

    pub fn sequence(items: Vec<SequenceItem>, ignore: Option<&Arc<IgnoreClause>>) -> Self {
        Self::Sequence {
            items,
            ignore: ignore.cloned(),
        }
    }

    pub fn recurrence(
        query: SpanQuery,
        min: usize,
        max: usize,
        ignore: Option<&Arc<IgnoreClause>>,
    ) -> Self {
        Self::Recurrence {
            query: Box::new(query),
            min,
            max,
            ignore: ignore.cloned(),
        }
    }

    pub fn start(query: SpanQuery) -> Self {
        Self::Start {
            query: Box::new(query),
        }
    }

    pub fn end(query: SpanQuery) -> Self {
        Self::End {
            query: Box::new(query),
        }
    }

    /// Returns true for atoms (nodes without subqueries)
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Term { .. }
                | Self::Prefix { .. }
                | Self::Wildcard { .. }
                | Self::Regexp { .. }
                | Self::Variable { .. }
                | Self::Operator { .. }
                | Self::Position { .. }
                | Self::All { .. }
        )
    }

    /// Returns the number of nodes in this plan (ignore clauses not included)
    pub fn node_count(&self) -> usize {
        1 + match self {
            Self::And { clauses } | Self::Or { clauses } => {
                clauses.iter().map(|q| q.node_count()).sum()
            }
            Self::Not { base, exclude } => base.node_count() + exclude.node_count(),
            Self::Sequence { items, .. } => items.iter().map(|i| i.query.node_count()).sum(),
            Self::Recurrence { query, .. } | Self::Start { query } | Self::End { query } => {
                query.node_count()
            }
            _ => 0,
        }
    }
}

fn write_clauses<'a>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    clauses: impl Iterator<Item = &'a SpanQuery>,
) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, clause) in clauses.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", clause)?;
    }
    write!(f, ")")
}

impl fmt::Display for SpanQuery {
    /// Renders a compact, single line representation of the plan (used in debug output)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term { prefix, value, .. } => write!(f, "{}=\"{}\"", prefix, value),
            Self::Prefix { prefix, .. } => write!(f, "{}", prefix),
            Self::Wildcard { prefix, value, .. } => write!(f, "{}~\"{}\"", prefix, value),
            Self::Regexp { prefix, value, .. } => write!(f, "{}=/{}/", prefix, value),
            Self::Variable { prefix, name, .. } => write!(f, "{}=${}", prefix, name),
            Self::Operator {
                prefix,
                operator,
                value,
                ..
            } => write!(f, "{}{}{}", prefix, operator, value),
            Self::Position { start, end, .. } => write!(f, "#{}-{}", start, end),
            Self::All { .. } => write!(f, "[]"),
            Self::And { clauses } => write_clauses(f, "AND", clauses.iter()),
            Self::Or { clauses } => write_clauses(f, "OR", clauses.iter()),
            Self::Not { base, exclude } => write!(f, "NOT({}, {})", base, exclude),
            Self::Sequence { items, ignore } => {
                write!(f, "SEQ(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if let Some(ignore) = ignore {
                    write!(f, " | ignore {}", ignore)?;
                }
                write!(f, ")")
            }
            Self::Recurrence {
                query,
                min,
                max,
                ignore,
            } => {
                write!(f, "REC({}, {}, {}", query, min, max)?;
                if let Some(ignore) = ignore {
                    write!(f, " | ignore {}", ignore)?;
                }
                write!(f, ")")
            }
            Self::Start { query } => write!(f, "START({})", query),
            Self::End { query } => write!(f, "END({})", query),
        }
    }
}

impl SequenceItem {
    pub fn new(query: SpanQuery, optional: bool) -> Self {
        Self { query, optional }
    }

    pub fn query(&self) -> &SpanQuery {
        &self.query
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the query, dropping the optional flag
    pub fn into_inner(self) -> SpanQuery {
        self.query
    }

    /// Turns the item into a standalone query. An optional item can only be expressed
    /// inside a sequence, so it becomes a sequence with this single item.
    pub fn into_query(self, ignore: Option<&Arc<IgnoreClause>>) -> SpanQuery {
        if self.optional {
            SpanQuery::sequence(vec![self], ignore)
        } else {
            self.query
        }
    }
}

impl fmt::Display for SequenceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.query, if self.optional { "?" } else { "" })
    }
}

impl IgnoreClause {
    pub fn new(query: SpanQuery, max_skip_length: usize) -> Self {
        Self {
            query,
            max_skip_length,
        }
    }

    pub fn query(&self) -> &SpanQuery {
        &self.query
    }

    /// The maximum number of consecutive positions that may be skipped
    pub fn max_skip_length(&self) -> usize {
        self.max_skip_length
    }
}

impl fmt::Display for IgnoreClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{0,{}}}", self.query, self.max_skip_length)
    }
}

#[sealed]
impl TypeInfo for SpanQuery {
    fn typeinfo() -> Type {
        Type::SpanQuery
    }
}

#[sealed]
impl TypeInfo for SequenceItem {
    fn typeinfo() -> Type {
        Type::SequenceItem
    }
}

#[sealed]
impl TypeInfo for IgnoreClause {
    fn typeinfo() -> Type {
        Type::IgnoreClause
    }
}

impl ToJson for SpanQuery {}
impl ToJson for IgnoreClause {}
impl FromJson for SpanQuery {}
impl FromJson for IgnoreClause {}

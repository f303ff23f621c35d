/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains shared types that are used throughout the library: the boolean [`Combinator`],
//! the [`Occurrence`] quantifier shared by all sentence parts, and the sealed [`Condition`] trait
//! through which every condition node is lowered into a [`SpanQuery`].

use sealed::sealed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::CqlError;
use crate::spanquery::{IgnoreClause, SequenceItem, SpanQuery};

/// An enumeration of the serialisable types in this library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Config,
    SpanQuery,
    SequenceItem,
    IgnoreClause,
}

impl TryFrom<&str> for Type {
    type Error = CqlError;
    fn try_from(val: &str) -> Result<Self, Self::Error> {
        match val {
            "Config" | "config" => Ok(Self::Config),
            "SpanQuery" | "spanquery" | "query" => Ok(Self::SpanQuery),
            "SequenceItem" | "sequenceitem" => Ok(Self::SequenceItem),
            "IgnoreClause" | "ignoreclause" | "ignore" => Ok(Self::IgnoreClause),
            _ => Err(CqlError::SerializationError(format!(
                "Expected a valid type, got {}",
                val
            ))),
        }
    }
}

impl Type {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "Config",
            Self::SpanQuery => "SpanQuery",
            Self::SequenceItem => "SequenceItem",
            Self::IgnoreClause => "IgnoreClause",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[sealed(pub(crate))] //<-- this ensures nobody outside this crate can implement the trait
pub trait TypeInfo {
    /// Return the type (introspection).
    fn typeinfo() -> Type;
}

/// The boolean operator that joins the atoms of a word condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    /// Returns the dual combinator (De Morgan): AND becomes OR and vice versa
    pub fn dual(&self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The quantifier of a sentence part: how many times it must occur, and whether it may be absent altogether.
///
/// The stored minimum is always at least one; a requested minimum of zero is expressed
/// by the `optional` flag instead. So `{0,3}` is stored as `min=1, max=3, optional`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occurrence {
    min: usize,
    max: usize,
    optional: bool,
}

impl Default for Occurrence {
    fn default() -> Self {
        Self {
            min: 1,
            max: 1,
            optional: false,
        }
    }
}

impl Occurrence {
    /// Instantiates a new occurrence range, fails if `min > max` or `max < 1`.
    pub fn new(min: usize, max: usize) -> Result<Self, CqlError> {
        if min > max || max < 1 {
            return Err(CqlError::IllegalOccurrence(min, max, "Occurrence::new"));
        }
        Ok(Self {
            min: min.max(1),
            max,
            optional: min == 0,
        })
    }

    /// A mandatory, single occurrence: `{1,1}`
    pub fn once() -> Self {
        Self::default()
    }

    /// The `?` quantifier: `{0,1}`
    pub fn optional() -> Self {
        Self {
            min: 1,
            max: 1,
            optional: true,
        }
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Minimum number of occurrences if present (always >= 1)
    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Returns true if the effective minimum is zero
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns true for a mandatory single occurrence, i.e. a quantifier that has no effect
    pub fn is_once(&self) -> bool {
        self.min == 1 && self.max == 1 && !self.optional
    }

    /// Coalesces the occurrences of two equal adjacent parts into one, if the combined
    /// range is contiguous. Returns `None` if the pair can not be expressed as a single range.
    ///
    /// A maximum of `usize::MAX` means unbounded; summed maxima saturate there.
    pub fn merge(&self, next: &Occurrence) -> Option<Occurrence> {
        let (min, optional) = match (self.optional, next.optional) {
            (false, false) => (self.min.checked_add(next.min)?, false),
            (false, true) if next.min == 1 => (self.min, false),
            (true, false) if self.min == 1 => (next.min, false),
            (true, true) if self.min == 1 && next.min == 1 => (1, true),
            _ => return None,
        };
        Some(Self {
            min,
            max: self.max.saturating_add(next.max),
            optional,
        })
    }

    /// Applies this quantifier to an already lowered item
    pub(crate) fn apply(
        &self,
        item: SequenceItem,
        ignore: Option<&Arc<IgnoreClause>>,
    ) -> SequenceItem {
        let optional = self.optional || item.is_optional();
        if self.max > 1 {
            SequenceItem::new(
                SpanQuery::recurrence(item.into_query(ignore), self.min, self.max, ignore),
                optional,
            )
        } else {
            SequenceItem::new(item.into_inner(), optional)
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.optional, self.min) {
            (true, 1) => write!(f, "{{0,{}}}", self.max),
            (true, min) => write!(f, "{{{},{}}}?", min, self.max),
            (false, min) => write!(f, "{{{},{}}}", min, self.max),
        }
    }
}

/// This trait is implemented by every condition node. It lowers the node into a span query plan
/// for the execution engine. This is a sealed trait, not implementable outside this crate.
#[sealed(pub(crate))]
pub trait Condition {
    /// Lowers the condition into a span query, using the given ignore clause for all sequences
    /// and recurrences that are constructed.
    fn query_with(&self, ignore: Option<&Arc<IgnoreClause>>) -> Result<SpanQuery, CqlError>;

    /// Lowers the condition into a span query without an ignore clause
    fn query(&self) -> Result<SpanQuery, CqlError> {
        self.query_with(None)
    }
}

/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

use sealed::sealed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::CqlError;
use crate::spanquery::{IgnoreClause, SpanQuery};
use crate::types::*;

/// Determines which part of a matched group is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupMode {
    /// The full span of the group (`<s/>`)
    Full,
    /// A zero-width anchor at the start of the group (`<s>`)
    Start,
    /// A zero-width anchor at the end of the group (`</s>`)
    End,
}

impl Default for GroupMode {
    fn default() -> Self {
        Self::Full
    }
}

impl GroupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Start => "START",
            Self::End => "END",
        }
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wraps an externally produced sub-query (a named group, such as a sentence or
/// entity span) so it can be used as a part of a sentence. The mode projects the group onto its full
/// span or onto its start or end position.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCondition {
    query: SpanQuery,
    mode: GroupMode,
}

impl GroupCondition {
    pub fn new(query: SpanQuery, mode: GroupMode) -> Self {
        Self { query, mode }
    }

    pub fn full(query: SpanQuery) -> Self {
        Self::new(query, GroupMode::Full)
    }

    pub fn start(query: SpanQuery) -> Self {
        Self::new(query, GroupMode::Start)
    }

    pub fn end(query: SpanQuery) -> Self {
        Self::new(query, GroupMode::End)
    }

    /// A group for a named span annotation, regardless of its value
    pub fn named(field: impl Into<String>, name: impl Into<String>, mode: GroupMode) -> Self {
        Self::new(SpanQuery::prefix(field, name), mode)
    }

    pub fn mode(&self) -> GroupMode {
        self.mode
    }

    /// Returns the wrapped sub-query, without projection
    pub fn inner(&self) -> &SpanQuery {
        &self.query
    }

    /// Lowers the group into a span query, this can not fail
    pub fn to_query(&self) -> SpanQuery {
        match self.mode {
            GroupMode::Full => self.query.clone(),
            GroupMode::Start => SpanQuery::start(self.query.clone()),
            GroupMode::End => SpanQuery::end(self.query.clone()),
        }
    }
}

#[sealed]
impl Condition for GroupCondition {
    fn query_with(&self, _ignore: Option<&Arc<IgnoreClause>>) -> Result<SpanQuery, CqlError> {
        Ok(self.to_query())
    }
}

/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

use std::collections::{HashMap, HashSet};

use crate::error::CqlError;
use crate::spanquery::SpanQuery;

/// Maps variable names to the lists of values they expand to, and tracks which
/// variables have been referenced by the query under construction. A variable may
/// only be referenced once per query.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, Vec<String>>,
    used: HashSet<String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern to define a variable
    pub fn with_variable<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, values);
        self
    }

    /// Defines a variable, replacing any earlier definition with the same name
    pub fn insert<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .insert(name.into(), values.into_iter().map(|s| s.into()).collect());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(|v| v.as_slice())
    }

    /// Has this variable already been referenced in the current query?
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Forget which variables were used, so the mapping can serve the next query
    pub fn reset(&mut self) {
        self.used.clear();
    }

    /// Produces a variable expansion atom for the given field and prefix.
    /// Fails if the variable is not defined, or was already referenced in this query.
    pub fn expand(
        &mut self,
        field: impl Into<String>,
        prefix: impl Into<String>,
        name: &str,
    ) -> Result<SpanQuery, CqlError> {
        let values = match self.values.get(name) {
            Some(values) => values.clone(),
            None => {
                return Err(CqlError::UndefinedVariable(
                    name.to_string(),
                    "Variables::expand",
                ))
            }
        };
        if !self.used.insert(name.to_string()) {
            return Err(CqlError::VariableReused(
                name.to_string(),
                "Variables::expand",
            ));
        }
        Ok(SpanQuery::Variable {
            field: field.into(),
            prefix: prefix.into(),
            name: name.to_string(),
            values,
        })
    }
}

/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`Compiler`], the entry point that turns the condition tree built by the
//! grammar into a span query plan for the execution engine.

use rayon::prelude::*;
use std::sync::Arc;

use crate::config::{debug, Config, Configurable};
use crate::error::CqlError;
use crate::sentence::SentenceCondition;
use crate::sentencepart::SentencePartCondition;
use crate::spanquery::{IgnoreClause, SpanQuery};
use crate::types::*;

/// Simplifies and lowers sentence conditions. Holds the configuration and the (optional) ignore clause,
/// which is shared read-only by every sequence and recurrence of every plan it produces.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: Config,
    ignore: Option<Arc<IgnoreClause>>,
}

impl Compiler {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ignore: None,
        }
    }

    /// Installs an ignore clause: positions matching the query may be skipped between sequence elements,
    /// at most [`Config::max_skip_length()`] at a time.
    pub fn with_ignore(self, query: SpanQuery) -> Self {
        let max_skip_length = self.config.max_skip_length();
        self.with_ignore_clause(IgnoreClause::new(query, max_skip_length))
    }

    pub fn with_ignore_clause(mut self, ignore: IgnoreClause) -> Self {
        self.ignore = Some(Arc::new(ignore));
        self
    }

    pub fn ignore(&self) -> Option<&IgnoreClause> {
        self.ignore.as_deref()
    }

    /// Simplifies the sentence and lowers it into a plan.
    /// Fails on any validation error; a partial plan is never returned.
    pub fn compile(&self, sentence: SentenceCondition) -> Result<SpanQuery, CqlError> {
        debug(&self.config, || {
            format!("Compiler::compile: input {:?}", sentence)
        });
        let sentence = sentence.simplify();
        debug(&self.config, || {
            format!("Compiler::compile: simplified {:?}", sentence)
        });
        let query = sentence.query_with(self.ignore.as_ref())?;
        debug(&self.config, || {
            format!(
                "Compiler::compile: plan {} ({} nodes)",
                query,
                query.node_count()
            )
        });
        Ok(query)
    }

    /// Assembles the full sentence from the builder and compiles it
    pub fn compile_part(&self, part: SentencePartCondition) -> Result<SpanQuery, CqlError> {
        self.compile(part.create_full_sentence()?)
    }

    /// Compiles many independent sentences in parallel. Results are returned in input order.
    pub fn compile_all(
        &self,
        sentences: Vec<SentenceCondition>,
    ) -> Vec<Result<SpanQuery, CqlError>> {
        debug(&self.config, || {
            format!("Compiler::compile_all: {} sentences", sentences.len())
        });
        sentences
            .into_par_iter()
            .map(|sentence| self.compile(sentence))
            .collect()
    }
}

impl Configurable for Compiler {
    fn config(&self) -> &Config {
        &self.config
    }

    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn set_config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }
}

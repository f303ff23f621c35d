/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! ## Introduction
//!
//! This library is the condition core of a corpus query language compiler. A grammar (not part of
//! this library) parses queries such as `[lemma="run" & !pos="N"]{2,3} ([word="a"] | <s/>)` and builds
//! a tree of conditions; this library simplifies that tree into its flattest equivalent form and
//! lowers it into a [`SpanQuery`] plan that an execution engine evaluates against a token-annotation
//! index.
//!
//! **What can you do with this library?**
//!
//! * Express token predicates as a boolean algebra with negation ([`WordCondition`]), simplified under
//!   associativity and De Morgan's laws into a canonical form ([`SimpleWordCondition`]).
//! * Build sequences of quantified words and groups ([`BasicSentenceCondition`]), where equal adjacent
//!   parts are coalesced into a single recurrence.
//! * Build alternation and nested, independently quantified sub-sequences ([`SentenceCondition`],
//!   [`SentencePartCondition`]).
//! * Compile conditions into plans, optionally allowing ignorable positions between sequence
//!   elements, and serialise the plans to JSON ([`Compiler`], [`ToJson`]).
//!
//! Condition types:
//! * [`WordCondition`] / [`SimpleWordCondition`]
//! * [`GroupCondition`]
//! * [`BasicSentencePartCondition`] / [`BasicSentenceCondition`]
//! * [`SentenceCondition`]
//! * [`SentencePartCondition`]

mod basicsentence;
mod compiler;
mod config;
mod error;
mod file;
mod group;
mod json;
mod sentence;
mod sentencepart;
mod spanquery;
mod types;
mod variables;
mod word;

// expose all structs and traits in the root namespace

pub use basicsentence::{BasicSentenceCondition, BasicSentencePartCondition, SentencePart};
pub use compiler::Compiler;
pub use config::{Config, Configurable};
pub use error::CqlError;
pub use group::{GroupCondition, GroupMode};
pub use json::{FromJson, ToJson};
pub use sentence::{SentenceCondition, SentenceKind};
pub use sentencepart::{Join, SentencePartCondition};
pub use spanquery::{Comparison, IgnoreClause, SequenceItem, SpanQuery};
pub use types::*;
pub use variables::Variables;
pub use word::{Atoms, SimpleWordCondition, WordCondition, WordShape};

pub use regex::Regex;

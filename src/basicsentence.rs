/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains the straight-line sentence: an ordered sequence of quantified
//! word and group parts without alternation.

use sealed::sealed;
use std::sync::Arc;

use crate::error::CqlError;
use crate::group::GroupCondition;
use crate::spanquery::{IgnoreClause, SequenceItem, SpanQuery};
use crate::types::*;
use crate::word::{SimpleWordCondition, WordCondition};

/// What occupies a position in a basic sentence
#[derive(Debug, Clone, PartialEq)]
pub enum SentencePart {
    Word(SimpleWordCondition),
    Group(GroupCondition),
}

impl SentencePart {
    /// Lowers the part without its quantifier
    pub fn to_query(&self) -> SpanQuery {
        match self {
            Self::Word(word) => word.to_query(),
            Self::Group(group) => group.to_query(),
        }
    }
}

impl From<WordCondition> for SentencePart {
    fn from(word: WordCondition) -> Self {
        Self::Word(word.simplify())
    }
}

impl From<SimpleWordCondition> for SentencePart {
    fn from(word: SimpleWordCondition) -> Self {
        Self::Word(word)
    }
}

impl From<GroupCondition> for SentencePart {
    fn from(group: GroupCondition) -> Self {
        Self::Group(group)
    }
}

/// A word or group together with its quantifier, as an element of a basic sentence
#[derive(Debug, Clone, PartialEq)]
pub struct BasicSentencePartCondition {
    part: SentencePart,
    occurrence: Occurrence,
}

impl BasicSentencePartCondition {
    pub fn new(part: impl Into<SentencePart>) -> Self {
        Self {
            part: part.into(),
            occurrence: Occurrence::once(),
        }
    }

    /// A word part, the word condition is simplified on the spot
    pub fn word(word: WordCondition) -> Self {
        Self::new(word)
    }

    pub fn group(group: GroupCondition) -> Self {
        Self::new(group)
    }

    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = occurrence;
        self
    }

    /// Sets the quantifier `{min,max}`; fails if `min > max` or `max < 1`.
    pub fn set_occurrence(&mut self, min: usize, max: usize) -> Result<&mut Self, CqlError> {
        self.occurrence = Occurrence::new(min, max)?;
        Ok(self)
    }

    pub fn set_optional(&mut self, optional: bool) -> &mut Self {
        self.occurrence = self.occurrence.with_optional(optional);
        self
    }

    pub fn part(&self) -> &SentencePart {
        &self.part
    }

    pub fn occurrence(&self) -> Occurrence {
        self.occurrence
    }

    pub fn is_optional(&self) -> bool {
        self.occurrence.is_optional()
    }

    /// Lowers the part with its quantifier applied
    pub(crate) fn item(&self, ignore: Option<&Arc<IgnoreClause>>) -> SequenceItem {
        self.occurrence
            .apply(SequenceItem::new(self.part.to_query(), false), ignore)
    }
}

#[sealed]
impl Condition for BasicSentencePartCondition {
    fn query_with(&self, ignore: Option<&Arc<IgnoreClause>>) -> Result<SpanQuery, CqlError> {
        Ok(self.item(ignore).into_query(ignore))
    }
}

/// A straight-line sequence of quantified parts. After [`Self::simplify()`] it can no longer be mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BasicSentenceCondition {
    parts: Vec<BasicSentencePartCondition>,
    simplified: bool,
}

impl BasicSentenceCondition {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_mutable(&self, contextmsg: &'static str) -> Result<(), CqlError> {
        if self.simplified {
            Err(CqlError::AlreadySimplified(contextmsg))
        } else {
            Ok(())
        }
    }

    pub fn add_part(&mut self, part: BasicSentencePartCondition) -> Result<&mut Self, CqlError> {
        self.check_mutable("BasicSentenceCondition::add_part")?;
        self.parts.push(part);
        Ok(self)
    }

    /// Builder pattern variant of [`Self::add_part()`]
    pub fn with_part(mut self, part: BasicSentencePartCondition) -> Result<Self, CqlError> {
        self.add_part(part)?;
        Ok(self)
    }

    pub fn add_word_part(
        &mut self,
        word: WordCondition,
        occurrence: Occurrence,
    ) -> Result<&mut Self, CqlError> {
        self.check_mutable("BasicSentenceCondition::add_word_part")?;
        self.parts
            .push(BasicSentencePartCondition::word(word).with_occurrence(occurrence));
        Ok(self)
    }

    pub fn add_group_part(
        &mut self,
        group: GroupCondition,
        occurrence: Occurrence,
    ) -> Result<&mut Self, CqlError> {
        self.check_mutable("BasicSentenceCondition::add_group_part")?;
        self.parts
            .push(BasicSentencePartCondition::group(group).with_occurrence(occurrence));
        Ok(self)
    }

    /// Appends all parts of another basic sentence to this one
    pub fn merge_basic_sentence(
        &mut self,
        other: BasicSentenceCondition,
    ) -> Result<&mut Self, CqlError> {
        self.check_mutable("BasicSentenceCondition::merge_basic_sentence")?;
        self.parts.extend(other.parts);
        Ok(self)
    }

    /// Appends the parts of another sentence regardless of simplification state, and coalesces again
    /// if this one was simplified. Used when sentences are fused during simplification.
    pub(crate) fn fuse(&mut self, other: BasicSentenceCondition) {
        if self.simplified {
            // the existing parts are already coalesced, continue the pass from the boundary
            for part in other.parts {
                push_coalesced(&mut self.parts, part);
            }
        } else {
            self.parts.extend(other.parts);
        }
    }

    pub fn parts(&self) -> &[BasicSentencePartCondition] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn is_simplified(&self) -> bool {
        self.simplified
    }

    /// A sentence is optional if it has parts and all of them are optional
    pub fn is_optional(&self) -> bool {
        !self.parts.is_empty() && self.parts.iter().all(|part| part.is_optional())
    }

    /// Coalesces structurally equal adjacent parts. Calling this more than once has no further effect.
    pub fn simplify(&mut self) -> &mut Self {
        if !self.simplified {
            self.parts = coalesce(std::mem::take(&mut self.parts));
            self.simplified = true;
        }
        self
    }

    /// Lowers into a sequence item; its optional flag is set if all parts are optional
    pub(crate) fn item(
        &self,
        ignore: Option<&Arc<IgnoreClause>>,
    ) -> Result<SequenceItem, CqlError> {
        match self.parts.as_slice() {
            [] => Err(CqlError::NoCondition("BasicSentenceCondition")),
            [part] => Ok(part.item(ignore)),
            parts => Ok(SequenceItem::new(
                SpanQuery::sequence(parts.iter().map(|part| part.item(ignore)).collect(), ignore),
                self.is_optional(),
            )),
        }
    }
}

/// Single left-to-right pass that merges each part into its predecessor when both are equal and their
/// occurrence ranges can be summed into one contiguous range.
fn coalesce(parts: Vec<BasicSentencePartCondition>) -> Vec<BasicSentencePartCondition> {
    let mut result: Vec<BasicSentencePartCondition> = Vec::with_capacity(parts.len());
    for part in parts {
        push_coalesced(&mut result, part);
    }
    result
}

/// One step of the coalescing pass: merges the part into the last one, or appends it
fn push_coalesced(parts: &mut Vec<BasicSentencePartCondition>, part: BasicSentencePartCondition) {
    if let Some(last) = parts.last_mut() {
        if last.part == part.part {
            if let Some(occurrence) = last.occurrence.merge(&part.occurrence) {
                last.occurrence = occurrence;
                return;
            }
        }
    }
    parts.push(part);
}

#[sealed]
impl Condition for BasicSentenceCondition {
    fn query_with(&self, ignore: Option<&Arc<IgnoreClause>>) -> Result<SpanQuery, CqlError> {
        Ok(self.item(ignore)?.into_query(ignore))
    }
}

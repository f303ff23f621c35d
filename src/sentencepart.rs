/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains the builder the grammar uses to join two parts of a sentence, either
//! sequence-wise (`A B`) or as alternatives (`A | B`). The second part is itself a
//! [`SentencePartCondition`], so a chain of parts forms a right-leaning list that is turned into
//! a single [`SentenceCondition`] by [`SentencePartCondition::create_full_sentence()`].

use crate::basicsentence::BasicSentenceCondition;
use crate::error::CqlError;
use crate::sentence::SentenceCondition;
use crate::types::*;

/// How the second part is joined to the first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Join {
    /// The second part follows the first
    Sequence,
    /// The second part is an alternative to the first
    Alternation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentencePartCondition {
    first: SentenceCondition,
    first_occurrence: Occurrence,
    second: Option<(Join, Box<SentencePartCondition>)>,
}

impl From<SentenceCondition> for SentencePartCondition {
    fn from(first: SentenceCondition) -> Self {
        Self::new(first)
    }
}

impl SentencePartCondition {
    pub fn new(first: SentenceCondition) -> Self {
        Self {
            first,
            first_occurrence: Occurrence::once(),
            second: None,
        }
    }

    pub fn from_basic(basic: BasicSentenceCondition) -> Self {
        Self::new(SentenceCondition::from_basic(basic))
    }

    /// Sets the pending quantifier of the first part; fails if `min > max` or `max < 1`.
    pub fn set_first_occurrence(&mut self, min: usize, max: usize) -> Result<&mut Self, CqlError> {
        self.first_occurrence = Occurrence::new(min, max)?;
        Ok(self)
    }

    pub fn set_first_optional(&mut self, optional: bool) -> &mut Self {
        self.first_occurrence = self.first_occurrence.with_optional(optional);
        self
    }

    pub fn with_first_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.first_occurrence = occurrence;
        self
    }

    pub fn set_second_part(&mut self, join: Join, second: SentencePartCondition) -> &mut Self {
        self.second = Some((join, Box::new(second)));
        self
    }

    /// Builder pattern: the second part follows the first
    pub fn then(mut self, second: impl Into<SentencePartCondition>) -> Self {
        self.set_second_part(Join::Sequence, second.into());
        self
    }

    /// Builder pattern: the second part is an alternative to the first
    pub fn or(mut self, second: impl Into<SentencePartCondition>) -> Self {
        self.set_second_part(Join::Alternation, second.into());
        self
    }

    pub fn first(&self) -> &SentenceCondition {
        &self.first
    }

    pub fn first_occurrence(&self) -> Occurrence {
        self.first_occurrence
    }

    pub fn join(&self) -> Option<Join> {
        self.second.as_ref().map(|(join, _)| *join)
    }

    /// Assembles the full sentence. Consumes the builder, so this happens exactly once.
    ///
    /// For an alternation, the second part is built first and the first part is then inserted
    /// in front of it, so alternatives keep the order in which they were written.
    pub fn create_full_sentence(self) -> Result<SentenceCondition, CqlError> {
        let first = self.first.quantify(self.first_occurrence);
        match self.second {
            None => Ok(first),
            Some((Join::Sequence, second)) => {
                // keep a parenthesised alternation in one piece: (A|B) C is not A|(B C)
                let mut sentence = if first.is_single() {
                    first
                } else {
                    first.grouped()
                };
                sentence.add_to_end_of_latest_sequence(second.create_full_sentence()?)?;
                Ok(sentence)
            }
            Some((Join::Alternation, second)) => {
                let mut sentence = second.create_full_sentence()?;
                sentence.add_as_first_option(first)?;
                Ok(sentence)
            }
        }
    }
}

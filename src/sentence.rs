/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains the general sentence condition, which adds alternation and nested,
//! independently quantified sub-sequences to the basic sentence.
//!
//! A [`SentenceCondition`] is either a basic sentence, or a composite: a list of alternatives,
//! each alternative being a sequence of sentence conditions. A basic sentence is promoted to a
//! composite the first time something is added that it can not absorb.
//!
//! [`SentenceCondition::simplify()`] rewrites the tree into its maximally flat form:
//! * adjacent unquantified basic sentences in a sequence are fused into one basic sentence
//!   (whose equal adjacent parts are then coalesced);
//! * an unquantified composite with a single alternative is spliced into the surrounding sequence;
//! * an alternative that consists of a single unquantified composite is replaced by the
//!   alternatives of that composite (`OR(OR(a,b),c)` becomes `OR(a,b,c)`);
//! * a composite with one alternative holding one element collapses into that element.

use sealed::sealed;
use std::sync::Arc;

use crate::basicsentence::BasicSentenceCondition;
use crate::error::CqlError;
use crate::spanquery::{IgnoreClause, SequenceItem, SpanQuery};
use crate::types::*;

#[derive(Debug, Clone, PartialEq)]
pub enum SentenceKind {
    Basic(BasicSentenceCondition),
    /// Alternatives, each a sequence
    Composite(Vec<Vec<SentenceCondition>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentenceCondition {
    kind: SentenceKind,
    occurrence: Occurrence,
    simplified: bool,
}

impl Default for SentenceCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BasicSentenceCondition> for SentenceCondition {
    fn from(basic: BasicSentenceCondition) -> Self {
        Self::from_basic(basic)
    }
}

impl SentenceCondition {
    /// Instantiates an empty basic sentence
    pub fn new() -> Self {
        Self::from_basic(BasicSentenceCondition::new())
    }

    pub fn from_basic(basic: BasicSentenceCondition) -> Self {
        Self {
            kind: SentenceKind::Basic(basic),
            occurrence: Occurrence::once(),
            simplified: false,
        }
    }

    /// Instantiates a composite without any alternatives
    pub fn composite() -> Self {
        Self::from_alternatives(Vec::new())
    }

    pub fn from_alternatives(alternatives: Vec<Vec<SentenceCondition>>) -> Self {
        Self {
            kind: SentenceKind::Composite(alternatives),
            occurrence: Occurrence::once(),
            simplified: false,
        }
    }

    fn check_mutable(&self, contextmsg: &'static str) -> Result<(), CqlError> {
        if self.simplified {
            Err(CqlError::AlreadySimplified(contextmsg))
        } else {
            Ok(())
        }
    }

    pub fn kind(&self) -> &SentenceKind {
        &self.kind
    }

    pub fn occurrence(&self) -> Occurrence {
        self.occurrence
    }

    pub fn is_basic(&self) -> bool {
        matches!(self.kind, SentenceKind::Basic(_))
    }

    /// Returns the basic sentence, if this is one
    pub fn basic(&self) -> Option<&BasicSentenceCondition> {
        match &self.kind {
            SentenceKind::Basic(basic) => Some(basic),
            SentenceKind::Composite(_) => None,
        }
    }

    /// Returns the alternatives, or an empty slice for a basic sentence
    pub fn alternatives(&self) -> &[Vec<SentenceCondition>] {
        match &self.kind {
            SentenceKind::Basic(_) => &[],
            SentenceKind::Composite(alternatives) => alternatives,
        }
    }

    /// Returns true if there is no alternation: a basic sentence or a composite with exactly one alternative
    pub fn is_single(&self) -> bool {
        match &self.kind {
            SentenceKind::Basic(_) => true,
            SentenceKind::Composite(alternatives) => alternatives.len() == 1,
        }
    }

    /// Returns true if the sentence may match nothing at all
    pub fn is_optional(&self) -> bool {
        self.occurrence.is_optional()
            || match &self.kind {
                SentenceKind::Basic(basic) => basic.is_optional(),
                SentenceKind::Composite(alternatives) => {
                    alternatives.len() == 1
                        && alternatives[0].iter().all(|element| element.is_optional())
                }
            }
    }

    pub fn is_simplified(&self) -> bool {
        self.simplified
    }

    /// Sets the quantifier `{min,max}` of the sentence as a whole; fails if `min > max` or `max < 1`.
    pub fn set_occurrence(&mut self, min: usize, max: usize) -> Result<&mut Self, CqlError> {
        self.check_mutable("SentenceCondition::set_occurrence")?;
        self.occurrence = Occurrence::new(min, max)?;
        Ok(self)
    }

    pub fn set_optional(&mut self, optional: bool) -> Result<&mut Self, CqlError> {
        self.check_mutable("SentenceCondition::set_optional")?;
        self.occurrence = self.occurrence.with_optional(optional);
        Ok(self)
    }

    /// Builder pattern variant of [`Self::set_occurrence()`]
    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Result<Self, CqlError> {
        self.check_mutable("SentenceCondition::with_occurrence")?;
        self.occurrence = occurrence;
        Ok(self)
    }

    /// Applies a quantifier to this sentence. If it already carries one, the sentence is wrapped
    /// first so both quantifiers keep their scope.
    pub(crate) fn quantify(mut self, occurrence: Occurrence) -> Self {
        if occurrence.is_once() {
            self
        } else if self.occurrence.is_once() {
            self.occurrence = occurrence;
            self
        } else {
            let mut wrapper = self.grouped();
            wrapper.occurrence = occurrence;
            wrapper
        }
    }

    /// Wraps the sentence as the sole element of a new composite with a single alternative
    pub(crate) fn grouped(self) -> Self {
        Self::from_alternatives(vec![vec![self]])
    }

    fn is_empty_basic(&self) -> bool {
        matches!(&self.kind, SentenceKind::Basic(basic) if basic.is_empty())
    }

    /// Packages the current sentence (with its quantifier) as the sole element of a new, single alternative
    fn promote(&mut self) {
        let inner = std::mem::replace(self, Self::composite());
        self.kind = SentenceKind::Composite(vec![vec![inner]]);
    }

    /// Appends a sentence to the sequence of the last alternative. A basic sentence absorbs an unquantified
    /// basic sentence directly, anything else promotes it to a composite.
    pub fn add_to_end_of_latest_sequence(
        &mut self,
        sentence: SentenceCondition,
    ) -> Result<&mut Self, CqlError> {
        self.check_mutable("SentenceCondition::add_to_end_of_latest_sequence")?;
        if self.is_empty_basic() && self.occurrence.is_once() {
            *self = sentence;
            self.simplified = false;
            return Ok(self);
        }
        if !self.occurrence.is_once() {
            self.promote();
        }
        if self.is_basic() && !(sentence.is_fusable() && self.is_fusable()) {
            self.promote();
        }
        match &mut self.kind {
            SentenceKind::Basic(basic) => {
                if let SentenceKind::Basic(other) = sentence.kind {
                    basic.fuse(other);
                }
            }
            SentenceKind::Composite(alternatives) => match alternatives.last_mut() {
                Some(sequence) => sequence.push(sentence),
                None => alternatives.push(vec![sentence]),
            },
        }
        Ok(self)
    }

    /// Adds a sentence as a new alternative, ahead of all existing ones
    pub fn add_as_first_option(
        &mut self,
        sentence: SentenceCondition,
    ) -> Result<&mut Self, CqlError> {
        self.check_mutable("SentenceCondition::add_as_first_option")?;
        if self.is_empty_basic() && self.occurrence.is_once() {
            *self = sentence;
            self.simplified = false;
            return Ok(self);
        }
        if self.is_basic() || !self.occurrence.is_once() {
            self.promote();
        }
        if let SentenceKind::Composite(alternatives) = &mut self.kind {
            alternatives.insert(0, vec![sentence]);
        }
        Ok(self)
    }

    /// Rewrites the sentence into its simplified form. This is a pure transformation and idempotent:
    /// simplifying a simplified sentence returns it unchanged. A simplified sentence can not be mutated.
    pub fn simplify(self) -> Self {
        if self.simplified {
            return self;
        }
        let occurrence = self.occurrence;
        match self.kind {
            SentenceKind::Basic(mut basic) => {
                basic.simplify();
                Self {
                    kind: SentenceKind::Basic(basic),
                    occurrence,
                    simplified: true,
                }
            }
            SentenceKind::Composite(alternatives) => {
                let mut alternatives: Vec<Vec<SentenceCondition>> =
                    alternatives.into_iter().map(compact_sequence).collect();
                if alternatives.len() > 1 {
                    alternatives = flatten_alternatives(alternatives);
                }
                collapse(alternatives, occurrence)
            }
        }
    }

    /// Can be fused with an adjacent basic sentence
    /// An empty basic sentence is never fusable, it has to reach lowering and fail there
    fn is_fusable(&self) -> bool {
        self.is_basic() && self.occurrence.is_once() && !self.is_empty_basic()
    }

    /// Can be spliced into a surrounding sequence
    fn is_spliceable(&self) -> bool {
        self.occurrence.is_once()
            && matches!(
                &self.kind,
                SentenceKind::Composite(alternatives)
                    if alternatives.len() == 1 && !alternatives[0].is_empty()
            )
    }

    /// Lowers the sentence, including its own quantifier, into a sequence item
    pub(crate) fn item(
        &self,
        ignore: Option<&Arc<IgnoreClause>>,
    ) -> Result<SequenceItem, CqlError> {
        let inner = match &self.kind {
            SentenceKind::Basic(basic) => basic.item(ignore)?,
            SentenceKind::Composite(alternatives) => match alternatives.as_slice() {
                [] => return Err(CqlError::NoCondition("SentenceCondition")),
                [sequence] => sequence_item(sequence, ignore)?,
                alternatives => {
                    let clauses = alternatives
                        .iter()
                        .map(|sequence| Ok(sequence_item(sequence, ignore)?.into_query(ignore)))
                        .collect::<Result<Vec<_>, CqlError>>()?;
                    SequenceItem::new(SpanQuery::Or { clauses }, false)
                }
            },
        };
        Ok(self.occurrence.apply(inner, ignore))
    }
}

/// Lowers one alternative
fn sequence_item(
    sequence: &[SentenceCondition],
    ignore: Option<&Arc<IgnoreClause>>,
) -> Result<SequenceItem, CqlError> {
    match sequence {
        [] => Err(CqlError::NoCondition("SentenceCondition (empty sequence)")),
        [element] => element.item(ignore),
        elements => {
            let items = elements
                .iter()
                .map(|element| element.item(ignore))
                .collect::<Result<Vec<_>, CqlError>>()?;
            let optional = items.iter().all(|item| item.is_optional());
            Ok(SequenceItem::new(
                SpanQuery::sequence(items, ignore),
                optional,
            ))
        }
    }
}

/// Simplifies every element of a sequence and merges neighbours left to right
fn compact_sequence(sequence: Vec<SentenceCondition>) -> Vec<SentenceCondition> {
    let mut compacted = Vec::with_capacity(sequence.len());
    for element in sequence {
        push_element(&mut compacted, element.simplify());
    }
    compacted
}

/// Appends a simplified element to a compacted sequence, merging it with its predecessor where possible
fn push_element(sequence: &mut Vec<SentenceCondition>, element: SentenceCondition) {
    if element.is_spliceable() {
        // single alternative without quantifier: its elements join this sequence
        if let SentenceKind::Composite(mut alternatives) = element.kind {
            if let Some(subsequence) = alternatives.pop() {
                for subelement in subsequence {
                    push_element(sequence, subelement);
                }
            }
        }
        return;
    }
    match sequence.last_mut() {
        Some(last) if last.is_fusable() && element.is_fusable() => {
            if let (SentenceKind::Basic(basic), SentenceKind::Basic(other)) =
                (&mut last.kind, element.kind)
            {
                basic.fuse(other);
            }
        }
        _ => sequence.push(element),
    }
}

/// Replaces alternatives that consist of a single unquantified composite by that composite's alternatives
fn flatten_alternatives(
    alternatives: Vec<Vec<SentenceCondition>>,
) -> Vec<Vec<SentenceCondition>> {
    let mut flattened = Vec::with_capacity(alternatives.len());
    for mut sequence in alternatives {
        // a composite without alternatives stays, so lowering reports it
        let nested = sequence.len() == 1
            && !sequence[0].is_basic()
            && !sequence[0].alternatives().is_empty()
            && sequence[0].occurrence.is_once();
        if nested {
            if let Some(SentenceCondition {
                kind: SentenceKind::Composite(subalternatives),
                ..
            }) = sequence.pop()
            {
                flattened.extend(subalternatives);
            }
        } else {
            flattened.push(sequence);
        }
    }
    flattened
}

/// Builds the simplified composite; a single alternative with a single element collapses into that element
fn collapse(
    mut alternatives: Vec<Vec<SentenceCondition>>,
    occurrence: Occurrence,
) -> SentenceCondition {
    if alternatives.len() == 1 && alternatives[0].len() == 1 {
        let collapsible = occurrence.is_once() || alternatives[0][0].occurrence.is_once();
        if collapsible {
            if let Some(mut element) = alternatives.pop().and_then(|mut sequence| sequence.pop()) {
                if !occurrence.is_once() {
                    element.occurrence = occurrence;
                }
                return element;
            }
        }
    }
    SentenceCondition {
        kind: SentenceKind::Composite(alternatives),
        occurrence,
        simplified: true,
    }
}

#[sealed]
impl Condition for SentenceCondition {
    fn query_with(&self, ignore: Option<&Arc<IgnoreClause>>) -> Result<SpanQuery, CqlError> {
        Ok(self.item(ignore)?.into_query(ignore))
    }
}

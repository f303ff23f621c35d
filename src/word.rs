/*
    spancql - corpus query condition compiler

        Licensed under the GNU General Public License v3
*/

//! This module contains the boolean algebra over token predicates at a single sequence position.
//!
//! A [`WordCondition`] is built by the grammar: a combinator (AND/OR), a negation flag,
//! positive atoms, negative atoms and nested child conditions. Its meaning is
//!
//! ```text
//! value = combinator(positive..., NOT negative..., children...)
//! result = if negated { NOT value } else { value }
//! ```
//!
//! Simplification folds all children into the atom lists and produces a [`SimpleWordCondition`],
//! which is what gets lowered into a [`SpanQuery`]. A simplified condition is never pure-negative
//! (negative atoms without positive atoms): its constructor swaps such a shape into its De Morgan dual.

use sealed::sealed;
use smallvec::SmallVec;
use std::sync::Arc;

use crate::error::CqlError;
use crate::spanquery::{IgnoreClause, SpanQuery};
use crate::types::*;

pub type Atoms = SmallVec<[SpanQuery; 2]>;

#[derive(Debug, Clone, PartialEq)]
pub struct WordCondition {
    field: String,
    combinator: Combinator,
    negated: bool,
    positive: Atoms,
    negative: Atoms,
    children: Vec<WordCondition>,
}

impl WordCondition {
    pub fn new(field: impl Into<String>, combinator: Combinator) -> Self {
        Self {
            field: field.into(),
            combinator,
            negated: false,
            positive: SmallVec::new(),
            negative: SmallVec::new(),
            children: Vec::new(),
        }
    }

    /// Shortcut for a new condition with the AND combinator
    pub fn and(field: impl Into<String>) -> Self {
        Self::new(field, Combinator::And)
    }

    /// Shortcut for a new condition with the OR combinator
    pub fn or(field: impl Into<String>) -> Self {
        Self::new(field, Combinator::Or)
    }

    pub fn add_positive_atom(&mut self, atom: SpanQuery) -> &mut Self {
        self.positive.push(atom);
        self
    }

    pub fn with_positive_atom(mut self, atom: SpanQuery) -> Self {
        self.positive.push(atom);
        self
    }

    pub fn add_negative_atom(&mut self, atom: SpanQuery) -> &mut Self {
        self.negative.push(atom);
        self
    }

    pub fn with_negative_atom(mut self, atom: SpanQuery) -> Self {
        self.negative.push(atom);
        self
    }

    pub fn add_child(&mut self, child: WordCondition) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn with_child(mut self, child: WordCondition) -> Self {
        self.children.push(child);
        self
    }

    /// Negates the whole condition (the `!` in front of a bracketed condition)
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn set_negated(&mut self, negated: bool) -> &mut Self {
        self.negated = negated;
        self
    }

    /// Returns the equivalent condition under De Morgan's law: the negation flag and the combinator flip,
    /// positive and negative atoms trade places, and every child has its negation flipped.
    /// `NOT(a AND b)` is thus rewritten as `(NOT a) OR (NOT b)`.
    pub fn swap_negation(self) -> Self {
        Self {
            field: self.field,
            combinator: self.combinator.dual(),
            negated: !self.negated,
            positive: self.negative,
            negative: self.positive,
            children: self
                .children
                .into_iter()
                .map(|child| child.negate())
                .collect(),
        }
    }

    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn positive_atoms(&self) -> &[SpanQuery] {
        &self.positive
    }

    pub fn negative_atoms(&self) -> &[SpanQuery] {
        &self.negative
    }

    pub fn children(&self) -> &[WordCondition] {
        &self.children
    }

    /// No atoms and no children; lowers to the match-all query
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty() && self.children.is_empty()
    }

    /// Exactly one atom and no children
    pub fn is_single(&self) -> bool {
        self.children.is_empty() && self.positive.len() + self.negative.len() == 1
    }

    /// Folds all children into the atom lists of this condition and returns the canonical,
    /// simplified form.
    pub fn simplify(&self) -> SimpleWordCondition {
        let mut positive = self.positive.clone();
        let mut negative = self.negative.clone();
        let mut matches_nothing = false;
        for child in self.children.iter() {
            let child = child.simplify();
            if child.is_empty() && self.combinator == Combinator::Or && child.negated {
                // OR(..., NOT everything): the operand drops out unless nothing else is left
                matches_nothing = true;
            } else if child.is_empty() && self.combinator == Combinator::And && !child.negated {
                // AND(..., everything): identity
            } else if child.is_single() {
                // a single atom fits either list, whatever the combinator
                if let WordShape::Positive(atoms) = child.shape {
                    if child.negated {
                        negative.extend(atoms);
                    } else {
                        positive.extend(atoms);
                    }
                }
            } else if !child.is_empty() && child.combinator == self.combinator && !child.negated {
                // associativity
                let (child_positive, child_negative) = child.shape.into_atoms();
                positive.extend(child_positive);
                negative.extend(child_negative);
            } else if !child.is_empty() && child.combinator != self.combinator && child.negated {
                // De Morgan: NOT(a OP b) == (NOT a) DUAL(OP) (NOT b)
                let (child_positive, child_negative) = child.shape.into_atoms();
                positive.extend(child_negative);
                negative.extend(child_positive);
            } else {
                // can not be absorbed (an empty child included), add it as a leaf with the sign of the child
                let leaf = child.core_query();
                if child.negated {
                    negative.push(leaf);
                } else {
                    positive.push(leaf);
                }
            }
        }
        if matches_nothing && positive.is_empty() && negative.is_empty() {
            negative.push(SpanQuery::all(self.field.as_str()));
        }
        SimpleWordCondition::new(
            self.field.clone(),
            self.combinator,
            self.negated,
            positive,
            negative,
        )
    }
}

impl From<SimpleWordCondition> for WordCondition {
    fn from(condition: SimpleWordCondition) -> Self {
        let (positive, negative) = condition.shape.into_atoms();
        Self {
            field: condition.field,
            combinator: condition.combinator,
            negated: condition.negated,
            positive,
            negative,
            children: Vec::new(),
        }
    }
}

/// The atoms of a simplified word condition. There is no variant for
/// negative atoms without positive ones.
#[derive(Debug, Clone, PartialEq)]
pub enum WordShape {
    /// No atoms at all, matches every token
    Empty,
    /// Only positive atoms (never empty)
    Positive(Atoms),
    /// Both positive and negative atoms (neither empty)
    Mixed { positive: Atoms, negative: Atoms },
}

impl WordShape {
    fn into_atoms(self) -> (Atoms, Atoms) {
        match self {
            Self::Empty => (SmallVec::new(), SmallVec::new()),
            Self::Positive(positive) => (positive, SmallVec::new()),
            Self::Mixed { positive, negative } => (positive, negative),
        }
    }
}

/// A word condition after simplification: no children, never pure-negative, and a mixed
/// shape always uses the AND combinator.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleWordCondition {
    field: String,
    combinator: Combinator,
    negated: bool,
    shape: WordShape,
}

impl SimpleWordCondition {
    /// The only way to construct a simplified condition, canonicalises the shape
    fn new(
        field: String,
        combinator: Combinator,
        negated: bool,
        positive: Atoms,
        negative: Atoms,
    ) -> Self {
        let (combinator, negated, shape) = match (positive.is_empty(), negative.is_empty()) {
            (true, true) => (combinator, negated, WordShape::Empty),
            (false, true) => (combinator, negated, WordShape::Positive(positive)),
            // pure negative: swap to the dual, the negative atoms become positive
            (true, false) => (combinator.dual(), !negated, WordShape::Positive(negative)),
            (false, false) => match combinator {
                Combinator::And => (
                    combinator,
                    negated,
                    WordShape::Mixed { positive, negative },
                ),
                // a OR NOT b == NOT(b AND NOT a)
                Combinator::Or => (
                    Combinator::And,
                    !negated,
                    WordShape::Mixed {
                        positive: negative,
                        negative: positive,
                    },
                ),
            },
        };
        Self {
            field,
            combinator,
            negated,
            shape,
        }
    }

    /// Simplifying a simplified condition is a no-op
    pub fn simplify(&self) -> SimpleWordCondition {
        self.clone()
    }

    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn shape(&self) -> &WordShape {
        &self.shape
    }

    pub fn positive_atoms(&self) -> &[SpanQuery] {
        match &self.shape {
            WordShape::Empty => &[],
            WordShape::Positive(positive) | WordShape::Mixed { positive, .. } => positive,
        }
    }

    pub fn negative_atoms(&self) -> &[SpanQuery] {
        match &self.shape {
            WordShape::Mixed { negative, .. } => negative,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shape == WordShape::Empty
    }

    pub fn is_single(&self) -> bool {
        matches!(&self.shape, WordShape::Positive(atoms) if atoms.len() == 1)
    }

    /// Lowers the condition without the outer negation
    fn core_query(&self) -> SpanQuery {
        match &self.shape {
            WordShape::Empty => SpanQuery::all(self.field.as_str()),
            WordShape::Positive(atoms) => SpanQuery::combine(self.combinator, atoms.to_vec()),
            WordShape::Mixed { positive, negative } => SpanQuery::not(
                SpanQuery::combine(Combinator::And, positive.to_vec()),
                SpanQuery::combine(Combinator::Or, negative.to_vec()),
            ),
        }
    }

    /// Lowers the condition into a span query. This can not fail.
    pub fn to_query(&self) -> SpanQuery {
        let query = self.core_query();
        if self.negated {
            SpanQuery::not(SpanQuery::all(self.field.as_str()), query)
        } else {
            query
        }
    }
}

#[sealed]
impl Condition for SimpleWordCondition {
    fn query_with(&self, _ignore: Option<&Arc<IgnoreClause>>) -> Result<SpanQuery, CqlError> {
        Ok(self.to_query())
    }
}

#[sealed]
impl Condition for WordCondition {
    /// Simplifies and lowers
    fn query_with(&self, _ignore: Option<&Arc<IgnoreClause>>) -> Result<SpanQuery, CqlError> {
        Ok(self.simplify().to_query())
    }
}

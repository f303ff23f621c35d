#![allow(dead_code)]
use spancql::*;

pub const FIELD: &str = "contents";

pub fn term(prefix: &str, value: &str) -> SpanQuery {
    SpanQuery::term(FIELD, prefix, value)
}

pub fn lemma(value: &str) -> SpanQuery {
    term("lemma", value)
}

pub fn pos(value: &str) -> SpanQuery {
    term("pos", value)
}

/// `[lemma="value"]` as a sentence
pub fn lemma_sentence(value: &str) -> Result<SentenceCondition, CqlError> {
    let mut basic = BasicSentenceCondition::new();
    basic.add_word_part(
        WordCondition::and(FIELD).with_positive_atom(lemma(value)),
        Occurrence::once(),
    )?;
    Ok(SentenceCondition::from_basic(basic))
}

/// `[lemma="value"]` as a sentence part
pub fn lemma_part(value: &str) -> Result<SentencePartCondition, CqlError> {
    Ok(SentencePartCondition::new(lemma_sentence(value)?))
}

/// `(...)`: a redundant grouping around a sentence
pub fn grouped(sentence: SentenceCondition) -> SentenceCondition {
    SentenceCondition::from_alternatives(vec![vec![sentence]])
}

pub fn sequence(queries: Vec<SpanQuery>, ignore: Option<&std::sync::Arc<IgnoreClause>>) -> SpanQuery {
    SpanQuery::sequence(
        queries
            .into_iter()
            .map(|query| SequenceItem::new(query, false))
            .collect(),
        ignore,
    )
}

/// `[lemma="the"] [pos="ADJ"]{0,2} [pos="N"]` followed by `<s/>` end anchor
pub fn setup_noun_phrase() -> Result<SentenceCondition, CqlError> {
    let mut basic = BasicSentenceCondition::new();
    basic.add_word_part(
        WordCondition::and(FIELD).with_positive_atom(lemma("the")),
        Occurrence::once(),
    )?;
    basic.add_word_part(
        WordCondition::and(FIELD).with_positive_atom(pos("ADJ")),
        Occurrence::new(0, 2)?,
    )?;
    basic.add_word_part(
        WordCondition::and(FIELD).with_positive_atom(pos("N")),
        Occurrence::once(),
    )?;
    basic.add_group_part(
        GroupCondition::named(FIELD, "s", GroupMode::End),
        Occurrence::once(),
    )?;
    Ok(SentenceCondition::from_basic(basic))
}

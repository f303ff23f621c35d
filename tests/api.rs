use std::sync::Arc;

mod common;
use crate::common::*;

use spancql::*;

#[test]
fn single_atom_unchanged() -> Result<(), CqlError> {
    let word = WordCondition::and(FIELD).with_positive_atom(lemma("run"));
    assert_eq!(word.query()?, lemma("run"));

    let compiler = Compiler::default();
    assert_eq!(compiler.compile_part(lemma_part("run")?)?, lemma("run"));
    Ok(())
}

#[test]
fn positive_and_negative_atom() -> Result<(), CqlError> {
    let word = WordCondition::and(FIELD)
        .with_positive_atom(pos("V"))
        .with_negative_atom(lemma("be"));
    assert_eq!(word.query()?, SpanQuery::not(pos("V"), lemma("be")));
    Ok(())
}

#[test]
fn identical_parts_become_recurrence() -> Result<(), CqlError> {
    let mut basic = BasicSentenceCondition::new();
    for _ in 0..3 {
        basic.add_word_part(
            WordCondition::and(FIELD).with_positive_atom(lemma("very")),
            Occurrence::once(),
        )?;
    }
    let compiler = Compiler::default();
    let query = compiler.compile(SentenceCondition::from_basic(basic))?;
    assert_eq!(query, SpanQuery::recurrence(lemma("very"), 3, 3, None));
    Ok(())
}

#[test]
fn alternatives_unwrapped() -> Result<(), CqlError> {
    let part = lemma_part("a")?.or(lemma_part("b")?.or(lemma_sentence("c")?));
    let query = Compiler::default().compile_part(part)?;
    assert_eq!(
        query,
        SpanQuery::Or {
            clauses: vec![lemma("a"), lemma("b"), lemma("c")]
        }
    );
    Ok(())
}

#[test]
fn quantified_sequence() -> Result<(), CqlError> {
    // ([lemma="a"] [lemma="b"]){2,4}
    let mut basic = BasicSentenceCondition::new();
    basic.add_word_part(
        WordCondition::and(FIELD).with_positive_atom(lemma("a")),
        Occurrence::once(),
    )?;
    basic.add_word_part(
        WordCondition::and(FIELD).with_positive_atom(lemma("b")),
        Occurrence::once(),
    )?;
    let mut part = SentencePartCondition::from_basic(basic);
    part.set_first_occurrence(2, 4)?;
    let query = Compiler::default().compile_part(part)?;
    assert_eq!(
        query,
        SpanQuery::recurrence(sequence(vec![lemma("a"), lemma("b")], None), 2, 4, None)
    );
    Ok(())
}

#[test]
fn no_condition() {
    let result = Compiler::default().compile(SentenceCondition::composite());
    match result {
        Err(e @ CqlError::NoCondition(_)) => {
            assert!(e.is_validation());
            assert!(e.to_string().contains("no condition"));
        }
        other => panic!("expected NoCondition, got {:?}", other),
    }
}

#[test]
fn de_morgan_equivalence() -> Result<(), CqlError> {
    let negated = WordCondition::and(FIELD)
        .with_positive_atom(lemma("a"))
        .with_positive_atom(pos("N"))
        .with_negative_atom(pos("PROPN"))
        .negate();
    let swapped = negated.clone().swap_negation();
    assert_ne!(negated, swapped);
    assert_eq!(negated.query()?, swapped.query()?);
    Ok(())
}

#[test]
fn flattening() -> Result<(), CqlError> {
    let compiler = Compiler::default();
    // (a|b)|c
    let inner = lemma_part("a")?.or(lemma_sentence("b")?).create_full_sentence()?;
    let nested = SentencePartCondition::new(inner).or(lemma_sentence("c")?);
    // a|b|c
    let flat = lemma_part("a")?.or(lemma_part("b")?.or(lemma_sentence("c")?));
    assert_eq!(compiler.compile_part(nested)?, compiler.compile_part(flat)?);
    Ok(())
}

#[test]
fn wrapper_neutrality() -> Result<(), CqlError> {
    let compiler = Compiler::default();
    let plain = lemma_part("a")?.then(lemma_sentence("b")?);
    let wrapped = SentencePartCondition::new(grouped(lemma_sentence("a")?))
        .then(grouped(lemma_sentence("b")?));
    let plain = plain.create_full_sentence()?.simplify();
    let wrapped = wrapped.create_full_sentence()?.simplify();
    assert_eq!(plain, wrapped);
    assert_eq!(
        compiler.compile(plain)?,
        sequence(vec![lemma("a"), lemma("b")], None)
    );
    Ok(())
}

#[test]
fn simplify_twice() -> Result<(), CqlError> {
    let part = lemma_part("a")?.then(
        lemma_part("a")?
            .then(SentencePartCondition::new(lemma_sentence("b")?).or(lemma_sentence("c")?)),
    );
    let sentence = part.create_full_sentence()?;
    let once = sentence.simplify();
    let twice = once.clone().simplify();
    assert_eq!(once.query()?, twice.query()?);
    Ok(())
}

#[test]
fn noun_phrase() -> Result<(), CqlError> {
    let query = Compiler::default().compile(setup_noun_phrase()?)?;
    assert_eq!(
        query,
        SpanQuery::sequence(
            vec![
                SequenceItem::new(lemma("the"), false),
                SequenceItem::new(SpanQuery::recurrence(pos("ADJ"), 1, 2, None), true),
                SequenceItem::new(pos("N"), false),
                SequenceItem::new(SpanQuery::end(SpanQuery::prefix(FIELD, "s")), false),
            ],
            None
        )
    );
    Ok(())
}

#[test]
fn ignore_clause_shared() -> Result<(), CqlError> {
    let compiler = Compiler::new(Config::default().with_max_skip_length(2)).with_ignore(pos("PUNCT"));
    assert_eq!(compiler.ignore().map(|ignore| ignore.max_skip_length()), Some(2));

    let mut quantified = lemma_part("a")?;
    quantified.set_first_occurrence(2, 3)?;
    let part = quantified.then(lemma_sentence("b")?);
    let query = compiler.compile_part(part)?;

    let ignore = Arc::new(IgnoreClause::new(pos("PUNCT"), 2));
    assert_eq!(
        query,
        sequence(
            vec![
                SpanQuery::recurrence(lemma("a"), 2, 3, Some(&ignore)),
                lemma("b")
            ],
            Some(&ignore)
        )
    );
    Ok(())
}

#[test]
fn compile_all_in_order() -> Result<(), CqlError> {
    let compiler = Compiler::default();
    let results = compiler.compile_all(vec![
        lemma_sentence("a")?,
        SentenceCondition::composite(),
        lemma_sentence("c")?,
    ]);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().ok(), Some(&lemma("a")));
    assert!(matches!(results[1], Err(CqlError::NoCondition(_))));
    assert_eq!(results[2].as_ref().ok(), Some(&lemma("c")));
    Ok(())
}

#[test]
fn compile_with_debug() -> Result<(), CqlError> {
    let compiler = Compiler::default().with_config(Config::default().with_debug(true));
    assert!(compiler.config().debug());
    compiler.compile(setup_noun_phrase()?)?;
    Ok(())
}

#[test]
fn plan_to_json() -> Result<(), CqlError> {
    let compiler = Compiler::default().with_ignore(pos("PUNCT"));
    let query = compiler.compile(setup_noun_phrase()?)?;
    let json = query.to_json_string(&Config::default())?;
    assert!(json.contains(r#""@type": "Sequence""#));
    assert!(json.contains(r#""max_skip_length": 1"#));
    let parsed = SpanQuery::from_json_str(&json)?;
    assert_eq!(parsed, query);
    Ok(())
}

#[test]
fn plan_to_json_file() -> Result<(), CqlError> {
    let config = Config::default().with_compact(true);
    let query = Compiler::default().compile(setup_noun_phrase()?)?;
    let path = std::env::temp_dir().join("spancql_plan_test.json");
    let filename = path.to_str().expect("temporary path must be valid unicode");
    query.to_json_file(filename, &config)?;
    let parsed = SpanQuery::from_json_file(filename, &config)?;
    assert_eq!(parsed, query);
    Ok(())
}

#[test]
fn variable_atom_in_word() -> Result<(), CqlError> {
    let mut variables = Variables::new().with_variable("verbs", ["run", "walk"]);
    let word = WordCondition::and(FIELD)
        .with_positive_atom(variables.expand(FIELD, "lemma", "verbs")?)
        .with_negative_atom(SpanQuery::regexp(FIELD, "word", "[A-Z].*")?);
    let query = word.query()?;
    assert!(matches!(query, SpanQuery::Not { .. }));
    assert!(matches!(
        variables.expand(FIELD, "lemma", "verbs"),
        Err(CqlError::VariableReused(..))
    ));
    Ok(())
}

#[test]
fn empty_alternative_fails_whole_query() -> Result<(), CqlError> {
    let mut sentence = SentenceCondition::composite();
    sentence.add_as_first_option(lemma_sentence("a")?)?;
    sentence.add_as_first_option(SentenceCondition::composite())?;
    let result = Compiler::default().compile(sentence);
    assert!(matches!(result, Err(CqlError::NoCondition(_))));
    Ok(())
}

#[test]
fn unbounded_repetition_coalesced() -> Result<(), CqlError> {
    // [lemma="a"]+ [lemma="a"]+
    let mut basic = BasicSentenceCondition::new();
    for _ in 0..2 {
        basic.add_word_part(
            WordCondition::and(FIELD).with_positive_atom(lemma("a")),
            Occurrence::new(1, usize::MAX)?,
        )?;
    }
    let query = Compiler::default().compile(SentenceCondition::from_basic(basic))?;
    assert_eq!(query, SpanQuery::recurrence(lemma("a"), 2, usize::MAX, None));
    Ok(())
}

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use spancql::*;

const FIELD: &str = "contents";

fn word(prefix: &str, value: &str) -> WordCondition {
    WordCondition::and(FIELD).with_positive_atom(SpanQuery::term(FIELD, prefix, value))
}

/// A long sequence in which runs of equal words alternate, so coalescing has work to do
fn long_sequence(len: usize) -> SentenceCondition {
    let mut basic = BasicSentenceCondition::new();
    for i in 0..len {
        let value = if (i / 3) % 2 == 0 { "the" } else { "N" };
        basic
            .add_word_part(word("lemma", value), Occurrence::once())
            .expect("adding a part to an unsimplified sentence");
    }
    SentenceCondition::from_basic(basic)
}

/// `a0 | (a1 | (a2 | ...))` built the way the grammar builds it
fn wide_alternation(width: usize) -> SentencePartCondition {
    let mut part: Option<SentencePartCondition> = None;
    for i in (0..width).rev() {
        let mut basic = BasicSentenceCondition::new();
        basic
            .add_word_part(word("lemma", &format!("a{}", i)), Occurrence::once())
            .expect("adding a part to an unsimplified sentence");
        let current = SentencePartCondition::from_basic(basic);
        part = Some(match part {
            Some(second) => current.or(second),
            None => current,
        });
    }
    part.expect("width must be at least one")
}

pub fn bench_compile(c: &mut Criterion) {
    let compiler = Compiler::default().with_ignore(SpanQuery::term(FIELD, "pos", "PUNCT"));

    let mut group = c.benchmark_group("compile_sequence");
    for len in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| {
                let query = compiler
                    .compile(black_box(long_sequence(len)))
                    .expect("compilation must succeed");
                assert!(query.node_count() > 0);
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("compile_alternation");
    for width in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| {
                let query = compiler
                    .compile_part(black_box(wide_alternation(width)))
                    .expect("compilation must succeed");
                assert!(query.node_count() > width);
            })
        });
    }
    group.finish();

    c.bench_function("compile_all", |b| {
        b.iter(|| {
            let sentences: Vec<_> = (0..64).map(|_| long_sequence(100)).collect();
            let results = compiler.compile_all(black_box(sentences));
            assert!(results.iter().all(|result| result.is_ok()));
        })
    });
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);

use alkane_isomers::utils::random_tree;
use alkane_isomers::{expand_with, ExpandOptions, Generation};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn generation_of(size: usize) -> Generation {
    let mut generation = Generation::base();
    while generation.size() < size {
        generation = expand_with(&generation, &ExpandOptions::default());
    }
    generation
}

fn bench_canonical_form(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let tree = random_tree(40, &mut rng).unwrap();

    c.bench_function("canonical_form_40", |b| b.iter(|| tree.canonical_form()));
}

fn bench_expand(c: &mut Criterion) {
    let source = generation_of(11);
    let sequential = ExpandOptions::sequential();
    let parallel = ExpandOptions::default();

    c.bench_function("expand_11_to_12_sequential", |b| {
        b.iter(|| expand_with(&source, &sequential))
    });
    c.bench_function("expand_11_to_12_parallel", |b| {
        b.iter(|| expand_with(&source, &parallel))
    });
}

criterion_group!(benches, bench_canonical_form, bench_expand);
criterion_main!(benches);

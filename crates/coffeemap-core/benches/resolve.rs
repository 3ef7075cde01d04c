use coffeemap_core::text::normalize;
use coffeemap_core::{resolve, Cutoff, ReferenceIndex};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const REFERENCE: [&str; 24] = [
    "Angola", "Bolivia", "Brazil", "Burundi", "Cameroon", "Central African Republic",
    "Colombia", "Costa Rica", "Cote d'Ivoire", "Cuba", "Democratic Republic of the Congo",
    "Dominican Republic", "Ecuador", "El Salvador", "Ethiopia", "Guatemala", "Honduras",
    "India", "Indonesia", "Kenya", "Mexico", "United Republic of Tanzania",
    "United States of America", "Vietnam",
];

const SOURCE: [&str; 12] = [
    "Bolivia (Plurinational State of)", "Brazil", "Côte d'Ivoire", "Congo, Dem. Rep. of the",
    "Dominican Rep.", "Ecuador", "Ethiopia", "Lao People's Democratic Republic",
    "Tanzania", "United States", "Viet Nam", "Atlantis",
];

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| {
            for name in SOURCE {
                black_box(normalize(black_box(name)));
            }
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    let index = ReferenceIndex::build(REFERENCE);
    c.bench_function("index_build", |b| {
        b.iter(|| black_box(ReferenceIndex::build(black_box(REFERENCE))))
    });
    c.bench_function("resolve", |b| {
        b.iter(|| black_box(resolve(black_box(SOURCE), &index, Cutoff::default())))
    });
}

criterion_group!(benches, bench_normalize, bench_resolve);
criterion_main!(benches);

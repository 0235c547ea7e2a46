use criterion::{Criterion, criterion_group, criterion_main};
use logseq_content::{parse_string, write_to_string};
mod common;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let outline = common::generate_outline(100);
    group.bench_function("outline", |b| {
        b.iter(|| {
            let tree = parse_string(std::hint::black_box(&outline)).unwrap();
            std::hint::black_box(tree);
        });
    });

    let journal = common::generate_journal(100);
    group.bench_function("journal", |b| {
        b.iter(|| {
            let tree = parse_string(std::hint::black_box(&journal)).unwrap();
            std::hint::black_box(tree);
        });
    });

    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("writing");
    group.sample_size(10);

    let tree = parse_string(&common::generate_outline(100)).unwrap();
    group.bench_function("outline", |b| {
        b.iter(|| {
            let out = write_to_string(std::hint::black_box(&tree), tree.root()).unwrap();
            std::hint::black_box(out);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_write);
criterion_main!(benches);

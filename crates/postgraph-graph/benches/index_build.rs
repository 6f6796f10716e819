//! Benchmarks for index and dataset construction

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use postgraph_core::{Corpus, Document, LinkConfig};
use postgraph_graph::{BacklinkIndex, GraphBuilder, LinkChecker};

/// Corpus of `n` posts, each linking to its two successors and one tag
fn bench_corpus(n: usize) -> Corpus {
    let docs = (0..n)
        .map(|i| {
            let body = format!(
                "# Post {i}\n\nSee [next](./post{}) and [later](/blog/post{}#intro).\n\n```cpp\nauto f = [&](int x) {{ return x; }};\n```\n",
                (i + 1) % n,
                (i + 2) % n
            );
            Document::new(format!("post{i}"), body).with_tags([format!("tag{}", i % 10)])
        })
        .collect();
    Corpus::new(docs)
}

fn bench_backlink_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("backlink_index_build");
    let config = LinkConfig::default();

    for size in [100, 1_000, 5_000] {
        let corpus = bench_corpus(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &corpus, |b, corpus| {
            b.iter(|| BacklinkIndex::build(black_box(corpus.documents()), &config))
        });
    }

    group.finish();
}

fn bench_backlink_lookup(c: &mut Criterion) {
    let corpus = bench_corpus(1_000);
    let index = BacklinkIndex::build(corpus.documents(), &LinkConfig::default());

    c.bench_function("backlink_lookup", |b| {
        b.iter(|| index.backlinks_for(black_box("post500")))
    });
}

fn bench_graph_dataset(c: &mut Criterion) {
    let corpus = bench_corpus(1_000);
    let builder = GraphBuilder::default();

    c.bench_function("graph_dataset_build_1000", |b| {
        b.iter(|| builder.build(black_box(corpus.documents())))
    });
}

fn bench_link_check(c: &mut Criterion) {
    let corpus = bench_corpus(1_000);
    let checker = LinkChecker::for_corpus(&corpus, &LinkConfig::default());

    c.bench_function("link_check_1000", |b| {
        b.iter(|| checker.check(black_box(corpus.documents())))
    });
}

criterion_group!(
    benches,
    bench_backlink_index,
    bench_backlink_lookup,
    bench_graph_dataset,
    bench_link_check
);
criterion_main!(benches);

//! Tree Composition Benchmarks
//!
//! **Purpose:** Measure performance of composition-tree building and the full
//! stats-to-chart-data pipeline over synthetic module lists
//!
//! **How to Run:**
//! ```bash
//! cargo bench --bench tree_composition
//! cargo bench --bench tree_composition -- --save-baseline main
//! cargo bench --bench tree_composition -- --baseline main
//! ```
//!
//! **What's Being Measured:**
//! 1. `compose tree` - Path insertion plus the folder merge pass
//! 2. `aggregate sizes` - stat/parsed reads over a finalized tree
//! 3. `full analysis pipeline` - Normalization, matching, composition and
//!    projection for one synthetic stats snapshot
//!
//! **Performance Tips:**
//! - Insertion cost is dominated by path splitting and map lookups
//! - Gzip sizes are memoized per node; only the first read compresses

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use bundlemap::analyzer::stats::RawChunk;
use bundlemap::analyzer::{
    AnalyzerOptions, BundleAnalyzer, CompositionTree, RawAsset, RawModule, RawStats, StatId,
};

fn synthetic_modules(count: usize) -> Vec<RawModule> {
    (0..count)
        .map(|i| RawModule {
            id: Some(StatId::Num(i as i64)),
            name: format!(
                "./node_modules/pkg_{}/lib/dir_{}/mod_{}.js",
                i % 20,
                i % 5,
                i
            ),
            size: 100 + (i as u64 % 900),
            chunks: vec![StatId::Num(0)],
            modules: None,
        })
        .collect()
}

fn synthetic_stats(count: usize) -> RawStats {
    RawStats {
        assets: vec![RawAsset {
            name: "bundle.js".to_string(),
            size: synthetic_modules(count).iter().map(|m| m.size).sum(),
            chunks: vec![StatId::Num(0)],
            is_child: false,
        }],
        chunks: vec![RawChunk {
            modules: synthetic_modules(count),
        }],
        ..Default::default()
    }
}

fn bench_tree_composition(c: &mut Criterion) {
    for count in [100usize, 1_000, 5_000] {
        let modules = synthetic_modules(count);

        c.bench_function(&format!("compose tree from {} modules", count), |b| {
            b.iter(|| {
                let mut tree = CompositionTree::new();
                for module in &modules {
                    tree.insert(black_box(module), None);
                }
                tree.merge_nested_folders();
                black_box(tree.stat_size())
            });
        });
    }
}

fn bench_size_aggregation(c: &mut Criterion) {
    let modules = synthetic_modules(1_000);
    let mut tree = CompositionTree::new();
    for module in &modules {
        tree.insert(module, None);
    }
    tree.merge_nested_folders();

    // stat_size is never cached: every read walks the tree.
    c.bench_function("aggregate stat sizes over 1000 modules", |b| {
        b.iter(|| black_box(tree.stat_size()));
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let analyzer = BundleAnalyzer::new(AnalyzerOptions::default());

    c.bench_function("full analysis pipeline with 1000 modules", |b| {
        b.iter(|| {
            let stats = synthetic_stats(1_000);
            black_box(analyzer.analyze(black_box(stats)))
        });
    });
}

criterion_group!(
    benches,
    bench_tree_composition,
    bench_size_aggregation,
    bench_full_pipeline
);
criterion_main!(benches);

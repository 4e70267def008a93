// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use onsett_bench::{segment_queries, staircase_run};
use onsett_costs::{CostL2Mean, CostModel, CostNormalMeanVar};

const N: usize = 100_000;
const QUERY_COUNT: usize = 100_000;

fn benchmark_cost_models(c: &mut Criterion) {
    let series = staircase_run(N, 2_000).expect("benchmark series should be valid");
    let view = series
        .pressure_view()
        .expect("benchmark view should be valid");

    let l2_model = CostL2Mean::default();
    let normal_model = CostNormalMeanVar::default();

    let mut group = c.benchmark_group("cost_models");

    group.bench_function("l2_precompute_n1e5", |b| {
        b.iter(|| {
            let _cache = l2_model
                .precompute(black_box(&view))
                .expect("precompute should succeed");
        })
    });

    group.bench_function("normal_precompute_n1e5", |b| {
        b.iter(|| {
            let _cache = normal_model
                .precompute(black_box(&view))
                .expect("precompute should succeed");
        })
    });

    let queries = segment_queries(N, QUERY_COUNT);
    let mut out_costs = vec![0.0; queries.len()];

    let l2_cache = l2_model.precompute(&view).expect("precompute should succeed");
    group.bench_function("l2_segment_queries_1e5", |b| {
        b.iter(|| {
            l2_model.segment_cost_batch(
                black_box(&l2_cache),
                black_box(&queries),
                black_box(&mut out_costs),
            );
        })
    });

    let normal_cache = normal_model
        .precompute(&view)
        .expect("precompute should succeed");
    group.bench_function("normal_segment_queries_1e5", |b| {
        b.iter(|| {
            normal_model.segment_cost_batch(
                black_box(&normal_cache),
                black_box(&queries),
                black_box(&mut out_costs),
            );
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_cost_models);
criterion_main!(benches);

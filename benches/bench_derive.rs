use std::time::Duration;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use networkdata::{
    RawEdge,
    bench_utils::{EdgeListShape, generate_edges},
    derive,
};

const RANDOM_SEED: u64 = 0x99AA;
const SF_SEED: u64 = 0x77CC;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

struct EdgeCase {
    label: String,
    edges: Vec<RawEdge>,
}

fn bench_scales() -> &'static [usize] {
    #[cfg(feature = "bench-ci")]
    {
        &[5_000, 10_000, 20_000]
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        &[10_000, 50_000, 100_000]
    }
}

fn random_cases() -> Vec<EdgeCase> {
    bench_scales()
        .iter()
        .map(|&nodes| EdgeCase {
            label: format!("random_{nodes}"),
            edges: generate_edges(
                EdgeListShape::Random {
                    edges: nodes.saturating_mul(5),
                },
                nodes,
                RANDOM_SEED + nodes as u64,
            ),
        })
        .collect()
}

fn scalefree_cases() -> Vec<EdgeCase> {
    bench_scales()
        .iter()
        .take(2)
        .map(|&nodes| EdgeCase {
            label: format!("sf_{nodes}"),
            edges: generate_edges(EdgeListShape::ScaleFree { m: 5 }, nodes, SF_SEED + nodes as u64),
        })
        .collect()
}

fn run_cases(c: &mut Criterion, group_name: &str, cases: &[EdgeCase]) {
    let mut group = c.benchmark_group(group_name);
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for case in cases {
        group.bench_function(BenchmarkId::from_parameter(&case.label), |b| {
            b.iter_batched(
                || case.edges.clone(),
                |edges| derive(edges, None).expect("derive"),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_derive_random(c: &mut Criterion) {
    run_cases(c, "derive_random", &random_cases());
}

fn bench_derive_scalefree(c: &mut Criterion) {
    run_cases(c, "derive_scalefree", &scalefree_cases());
}

criterion_group!(
    name = derive_benches;
    config = Criterion::default();
    targets = bench_derive_random, bench_derive_scalefree
);
criterion_main!(derive_benches);

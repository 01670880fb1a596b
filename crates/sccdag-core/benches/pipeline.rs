use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sccdag_core::{AnalysisOptions, Graph, analyze, scc, topo};

#[derive(Clone, Copy, Debug)]
struct Tier {
    name: &'static str,
    vertices: usize,
    edges: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "S",
        vertices: 1_000,
        edges: 4_000,
    },
    Tier {
        name: "M",
        vertices: 10_000,
        edges: 40_000,
    },
    Tier {
        name: "L",
        vertices: 100_000,
        edges: 400_000,
    },
];

/// Random directed graph with mostly forward edges and a sprinkling of back
/// edges, so it has a mix of large and singleton components.
fn random_graph(tier: Tier, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new(tier.vertices, true);
    for _ in 0..tier.edges {
        let a = rng.gen_range(0..tier.vertices);
        let b = rng.gen_range(0..tier.vertices);
        let (from, to) = if rng.gen_range(0..10) == 0 {
            (a.max(b), a.min(b))
        } else {
            (a.min(b), a.max(b))
        };
        let weight = rng.gen_range(-20..=100);
        if graph.add_edge(from, to, weight).is_err() {
            unreachable!("endpoints drawn from 0..vertices");
        }
    }
    graph
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline.tiered");
    group.sample_size(10);

    for (i, tier) in TIERS.into_iter().enumerate() {
        let graph = random_graph(tier, 0x5CC_DA6 + i as u64);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("scc", tier.name), &graph, |b, g| {
            b.iter(|| black_box(scc::kosaraju(g)));
        });

        let components = scc::kosaraju(&graph).output;
        let dag = match graph.condensation(
            components.comp_id(),
            components.len(),
            AnalysisOptions::default().parallel_edges,
        ) {
            Ok(dag) => dag,
            Err(err) => panic!("condensation failed: {err}"),
        };

        group.bench_with_input(BenchmarkId::new("topo", tier.name), &dag, |b, dag| {
            b.iter(|| black_box(topo::kahn(dag)));
        });

        group.bench_with_input(BenchmarkId::new("analyze", tier.name), &graph, |b, g| {
            b.iter(|| black_box(analyze(g, 0, &AnalysisOptions::default())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);

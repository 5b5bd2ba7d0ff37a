//! Performance benchmarks for the fingerprint pipeline.
//!
//! Run with: `cargo bench --bench hashing`
//!
//! The per-structure pipeline is pure computation over in-memory graphs;
//! batch throughput is this number times the worker count.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use crystal_graph_kernel::{
    extract_fragments, FingerprintSet, FragmentOptions, Lattice, PeriodicEdge, PeriodicGraph,
    Site,
};

/// Periodic carbon ring of `n` sites with a pendant hydrogen on every
/// third site, a rough stand-in for a decorated framework.
fn make_framework(n: usize) -> PeriodicGraph {
    let mut sites: Vec<Site> = (0..n)
        .map(|i| Site::new("C", [i as f64 / n as f64, 0.0, 0.0]))
        .collect();
    let mut edges: Vec<PeriodicEdge> = (1..n)
        .map(|i| PeriodicEdge::new(i - 1, i, [0, 0, 0]))
        .collect();
    edges.push(PeriodicEdge::new(n - 1, 0, [1, 0, 0]));

    for i in (0..n).step_by(3) {
        let h = sites.len();
        sites.push(Site::new("H", [i as f64 / n as f64, 0.1, 0.0]));
        edges.push(PeriodicEdge::new(i, h, [0, 0, 0]));
    }
    let lattice = Lattice::cubic(n as f64).expect("cubic lattice is valid");
    PeriodicGraph::from_edges(lattice, sites, edges).expect("benchmark framework must be valid")
}

fn bench_fingerprints(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint_set");

    for num_sites in [6, 24, 96] {
        let graph = make_framework(num_sites);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("simple", num_sites),
            &graph,
            |b, graph| {
                b.iter(|| {
                    let set = FingerprintSet::compute(black_box(graph), false);
                    assert!(!set.is_missing());
                    set
                })
            },
        );
        group.bench_with_input(BenchmarkId::new("lqg", num_sites), &graph, |b, graph| {
            b.iter(|| {
                let set = FingerprintSet::compute(black_box(graph), true);
                assert!(!set.is_missing());
                set
            })
        });
    }

    group.finish();
}

fn bench_fragment_extraction(c: &mut Criterion) {
    // A cell with a handful of isolated molecules exercises the supercell
    // expansion and the isomorphism deduplication.
    let mut sites = Vec::new();
    let mut edges = Vec::new();
    for m in 0..4 {
        let base = sites.len();
        let origin = 0.2 * m as f64;
        sites.push(Site::new("O", [origin, origin, 0.3]));
        sites.push(Site::new("H", [origin + 0.05, origin, 0.3]));
        sites.push(Site::new("H", [origin, origin + 0.05, 0.3]));
        edges.push(PeriodicEdge::new(base, base + 1, [0, 0, 0]));
        edges.push(PeriodicEdge::new(base, base + 2, [0, 0, 0]));
    }
    let graph = PeriodicGraph::from_edges(Lattice::cubic(20.0).unwrap(), sites, edges)
        .expect("benchmark molecules must be valid");

    c.bench_function("extract_fragments_unique", |b| {
        b.iter(|| {
            let fragments = extract_fragments(black_box(&graph), &FragmentOptions::default());
            assert_eq!(fragments.len(), 1);
            fragments
        })
    });
}

criterion_group!(benches, bench_fingerprints, bench_fragment_extraction);
criterion_main!(benches);

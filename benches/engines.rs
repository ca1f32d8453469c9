use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use path_engine::graph::generators::random_connected_graph;
use path_engine::schedule::{compute_schedule, demo_project};
use path_engine::algorithm::PathSearchAlgorithm;
use path_engine::{enumerate_top_k_paths, Directedness, LabelSetting, Objective};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn benchmark_objectives(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_setting");
    let mut rng = StdRng::seed_from_u64(1);

    for &size in &[100usize, 1_000, 10_000] {
        let graph = random_connected_graph(&mut rng, size, size * 2, 100, Directedness::Undirected);
        for objective in Objective::ALL {
            let engine = LabelSetting::new(objective).with_steps(false);
            group.bench_with_input(BenchmarkId::new(objective.name(), size), &graph, |b, graph| {
                b.iter(|| black_box(engine.search(graph, &0, &(size - 1))))
            });
        }
    }

    group.finish();
}

fn benchmark_top_k_paths(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let graph = random_connected_graph(&mut rng, 10, 10, 20, Directedness::Undirected);

    c.bench_function("top_5_simple_paths_10_nodes", |b| {
        b.iter(|| black_box(enumerate_top_k_paths(&graph, &0, &9, 5)))
    });
}

fn benchmark_schedule(c: &mut Criterion) {
    let project = demo_project();

    c.bench_function("critical_path_demo_project", |b| {
        b.iter(|| black_box(compute_schedule(&project)))
    });
}

criterion_group!(benches, benchmark_objectives, benchmark_top_k_paths, benchmark_schedule);
criterion_main!(benches);

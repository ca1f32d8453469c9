use std::time::{Duration, Instant};

use path_engine::algorithm::all_paths::{enumerate_top_k_paths_with_budget, EnumerationBudget};
use path_engine::algorithm::PathSearchAlgorithm;
use path_engine::graph::generators::random_graph;
use path_engine::graph::Graph;
use path_engine::schedule::{compute_schedule, Task, TaskSet};
use path_engine::{Directedness, LabelSetting, Objective, WeightedGraph};

// Function to benchmark one objective on a graph
fn benchmark_objective(objective: Objective, graph: &WeightedGraph<usize, f64>, source: usize, target: usize) -> Duration {
    println!("Running {} on graph with {} nodes...", objective, graph.node_count());

    // The step trace is quadratic in the node count, leave it out
    let engine = LabelSetting::new(objective).with_steps(false);
    let start = Instant::now();
    let result = engine.search(graph, &source, &target);
    let duration = start.elapsed();

    match result {
        Ok(result) if result.is_reachable() => println!(
            "  - Value {} over {} hops in {:?} ({} frontier pops)",
            result.value,
            result.path.len() - 1,
            duration,
            result.stats.frontier_pops
        ),
        Ok(_) => println!("  - Target unreachable, {:?}", duration),
        Err(err) => println!("  - Failed: {}", err),
    }

    duration
}

// Layered task graph: every task depends on up to three tasks of the previous layer
fn layered_project(layers: usize, width: usize) -> TaskSet<f64> {
    let mut tasks = TaskSet::new();
    for layer in 0..layers {
        for slot in 0..width {
            let predecessors: Vec<String> = if layer == 0 {
                Vec::new()
            } else {
                (0..3)
                    .map(|offset| format!("t{}", (layer - 1) * width + (slot + offset) % width))
                    .collect()
            };
            let duration = ((layer * 7 + slot * 13) % 10 + 1) as f64;
            if let Err(err) = tasks.insert(Task::new(format!("t{}", layer * width + slot), duration, predecessors)) {
                println!("  - Skipping task: {}", err);
            }
        }
    }
    tasks
}

fn main() {
    // Define graph sizes to test
    let graph_sizes = vec![1_000, 10_000, 50_000, 100_000];

    // Edge factor: average number of edges per node
    let edge_factor = 3.0;

    println!("=====================================================");
    println!("Benchmark: label-setting search per objective");
    println!("Edge factor: {} edges per node (on average)", edge_factor);
    println!("=====================================================");

    let mut results = Vec::new();

    for &size in &graph_sizes {
        println!("\nGenerating random graph with {} nodes...", size);
        let graph = random_graph(size, edge_factor, Directedness::Directed);
        let (source, target) = (0, size - 1);
        println!("Graph has {} nodes and {} edges", graph.node_count(), graph.edge_count());

        let timings: Vec<Duration> = Objective::ALL
            .iter()
            .map(|&objective| benchmark_objective(objective, &graph, source, target))
            .collect();
        results.push((size, timings));
    }

    println!("\n=====================================================");
    println!("Summary of Results");
    println!("=====================================================");
    println!(
        "{:<10} | {:<18} | {:<18} | {:<18}",
        "Nodes", "minimize-sum (ms)", "maximize-sum (ms)", "minimize-max (ms)"
    );
    println!("-----------------------------------------------------");
    for (size, timings) in &results {
        let ms: Vec<f64> = timings.iter().map(|t| t.as_secs_f64() * 1000.0).collect();
        println!("{:<10} | {:<18.2} | {:<18.2} | {:<18.2}", size, ms[0], ms[1], ms[2]);
    }

    println!("\n=====================================================");
    println!("Benchmark: top-K simple path enumeration");
    println!("=====================================================");
    for &size in &[8usize, 10, 12] {
        let graph = random_graph(size, 2.5, Directedness::Undirected);
        let start = Instant::now();
        let budget = EnumerationBudget::default().with_max_expansions(5_000_000);
        match enumerate_top_k_paths_with_budget(&graph, &0, &(size - 1), 5, budget) {
            Ok(paths) => println!(
                "{:<4} nodes: {} paths kept in {:?}",
                size,
                paths.len(),
                start.elapsed()
            ),
            Err(err) => println!("{:<4} nodes: {} after {:?}", size, err, start.elapsed()),
        }
    }

    println!("\n=====================================================");
    println!("Benchmark: critical path scheduling");
    println!("=====================================================");
    for &layers in &[10usize, 100, 1_000] {
        let project = layered_project(layers, 50);
        let start = Instant::now();
        match compute_schedule(&project) {
            Ok(schedule) => println!(
                "{:<6} tasks: duration {}, critical path of {} tasks in {:?}",
                project.len(),
                schedule.project_duration,
                schedule.critical_path.len(),
                start.elapsed()
            ),
            Err(err) => println!("{:<6} tasks: failed: {}", project.len(), err),
        }
    }
}

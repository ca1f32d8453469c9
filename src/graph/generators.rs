use rand::prelude::*;

use crate::graph::{Directedness, MutableGraph, WeightedGraph};

/// The five-node graph used by the path search demos:
/// `A–B:5, A–C:2, B–C:1, B–D:3, C–D:6, D–E:2`
pub fn demo_graph() -> WeightedGraph<String, f64> {
    let edges = [
        ("A", "B", 5.0),
        ("A", "C", 2.0),
        ("B", "C", 1.0),
        ("B", "D", 3.0),
        ("C", "D", 6.0),
        ("D", "E", 2.0),
    ];
    let mut graph = WeightedGraph::undirected();
    for id in ["A", "B", "C", "D", "E"] {
        graph.add_node(id.to_string());
    }
    for (from, to, weight) in edges {
        let added = graph.add_edge(from.to_string(), to.to_string(), weight);
        debug_assert!(added.is_ok(), "demo edge {} - {} rejected: {:?}", from, to, added);
    }
    graph
}

/// Generates a connected random graph on nodes `0..n`.
///
/// A random spanning tree guarantees connectivity, then `extra_edges` more
/// edges are sprinkled in. Weights are integers in `1..=max_weight` so that
/// sums stay exact in floating point.
pub fn random_connected_graph<R: Rng>(
    rng: &mut R,
    n: usize,
    extra_edges: usize,
    max_weight: u32,
    directedness: Directedness,
) -> WeightedGraph<usize, f64> {
    let mut graph = WeightedGraph::new(directedness);
    for v in 0..n {
        graph.add_node(v);
    }
    if n < 2 {
        return graph;
    }

    let max_weight = max_weight.max(1);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    for i in 1..n {
        let parent = order[rng.gen_range(0..i)];
        let weight = f64::from(rng.gen_range(1..=max_weight));
        let added = graph.add_edge(parent, order[i], weight);
        debug_assert!(added.is_ok(), "tree edge rejected: {:?}", added);
    }

    for _ in 0..extra_edges {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        // Avoid self-loops
        if u != v {
            let weight = f64::from(rng.gen_range(1..=max_weight));
            let added = graph.add_edge(u, v, weight);
            debug_assert!(added.is_ok(), "extra edge rejected: {:?}", added);
        }
    }

    graph
}

/// Generates a random graph with roughly `edge_factor * n` edges using the thread RNG
pub fn random_graph(n: usize, edge_factor: f64, directedness: Directedness) -> WeightedGraph<usize, f64> {
    let mut rng = rand::thread_rng();
    let extra = (edge_factor * n as f64) as usize;
    random_connected_graph(&mut rng, n, extra.saturating_sub(n), 100, directedness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use rand::rngs::StdRng;

    #[test]
    fn test_demo_graph_shape() {
        let graph = demo_graph();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.edge_weight(&"C".to_string(), &"B".to_string()), Some(1.0));
    }

    #[test]
    fn test_random_graph_is_seeded_and_connected() {
        let a = random_connected_graph(&mut StdRng::seed_from_u64(7), 12, 10, 9, Directedness::Undirected);
        let b = random_connected_graph(&mut StdRng::seed_from_u64(7), 12, 10, 9, Directedness::Undirected);
        assert_eq!(a, b);
        assert!(a.edge_count() >= 11);
        assert!(a.validate_non_negative());
    }
}

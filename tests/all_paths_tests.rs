use path_engine::algorithm::all_paths::{enumerate_simple_paths, WeightedPath};
use path_engine::algorithm::path_weight;
use path_engine::graph::generators::random_connected_graph;
use path_engine::{
    enumerate_top_k_paths, enumerate_top_k_paths_with_budget, Directedness, EnumerationBudget, Error, WeightedGraph,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn diamond() -> WeightedGraph<&'static str, f64> {
    WeightedGraph::from_edges(
        Directedness::Undirected,
        [("s", "a", 1.0), ("s", "b", 4.0), ("a", "t", 5.0), ("b", "t", 1.0), ("a", "b", 2.0)],
    )
    .unwrap()
}

#[test]
fn test_top_two_paths_in_diamond() {
    let paths = enumerate_top_k_paths(&diamond(), &"s", &"t", 2).unwrap();

    assert_eq!(
        paths,
        vec![
            WeightedPath {
                path: vec!["s", "b", "a", "t"],
                weight: 11.0
            },
            WeightedPath {
                path: vec!["s", "a", "t"],
                weight: 6.0
            },
        ]
    );
}

#[test]
fn test_k_larger_than_path_count_returns_all_descending() {
    let paths = enumerate_top_k_paths(&diamond(), &"s", &"t", 10).unwrap();
    let weights: Vec<f64> = paths.iter().map(|p| p.weight).collect();
    assert_eq!(weights, vec![11.0, 6.0, 5.0, 4.0]);
}

#[test]
fn test_k_zero_returns_nothing() {
    assert!(enumerate_top_k_paths(&diamond(), &"s", &"t", 0).unwrap().is_empty());
}

#[test]
fn test_equal_weights_keep_discovery_order() {
    let square = WeightedGraph::from_edges(
        Directedness::Undirected,
        [("s", "a", 1.0), ("s", "b", 1.0), ("a", "t", 1.0), ("b", "t", 1.0)],
    )
    .unwrap();
    let paths = enumerate_top_k_paths(&square, &"s", &"t", 2).unwrap();

    assert_eq!(paths[0].path, vec!["s", "a", "t"]);
    assert_eq!(paths[1].path, vec!["s", "b", "t"]);
}

#[test]
fn test_source_equals_target_is_the_trivial_path() {
    let paths = enumerate_top_k_paths(&diamond(), &"a", &"a", 3).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].path, vec!["a"]);
    assert_eq!(paths[0].weight, 0.0);
}

#[test]
fn test_unreachable_target_yields_no_paths() {
    let graph = WeightedGraph::from_edges(Directedness::Directed, [("s", "a", 1.0), ("t", "s", 1.0)]).unwrap();
    assert!(enumerate_top_k_paths(&graph, &"s", &"t", 3).unwrap().is_empty());
}

#[test]
fn test_missing_endpoint_is_rejected() {
    assert_eq!(
        enumerate_top_k_paths(&diamond(), &"s", &"zz", 1),
        Err(Error::InvalidEndpoint("zz".to_string()))
    );
}

#[test]
fn test_budget_exhaustion_is_an_error() {
    let budget = EnumerationBudget::default().with_max_expansions(2);
    assert_eq!(
        enumerate_top_k_paths_with_budget(&diamond(), &"s", &"t", 1, budget),
        Err(Error::BudgetExceeded { limit: 2 })
    );
}

#[test]
fn test_paths_are_simple_and_weights_match() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..10 {
        let graph = random_connected_graph(&mut rng, 7, 5, 9, Directedness::Undirected);
        let all = enumerate_simple_paths(&graph, &0, &6, EnumerationBudget::default()).unwrap();
        let top = enumerate_top_k_paths(&graph, &0, &6, 3).unwrap();

        assert_eq!(top.len(), all.len().min(3));
        for found in &all {
            let mut seen = found.path.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), found.path.len());
            assert_eq!(path_weight(&graph, &found.path), Some(found.weight));
        }

        let heaviest = all.iter().map(|p| p.weight).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(top[0].weight, heaviest);
        assert!(top.windows(2).all(|pair| pair[0].weight >= pair[1].weight));
    }
}

#[test]
fn test_long_chain_does_not_exhaust_the_stack() {
    let n = 200_000usize;
    let chain = WeightedGraph::from_edges(Directedness::Directed, (0..n - 1).map(|i| (i, i + 1, 1.0))).unwrap();

    let paths = enumerate_simple_paths(&chain, &0, &(n - 1), EnumerationBudget::default()).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].path.len(), n);
    assert_eq!(paths[0].weight, (n - 1) as f64);

    let top = enumerate_top_k_paths(&chain, &(n - 1), &0, 1).unwrap();
    assert!(top.is_empty());
}

use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

use crate::algorithm::Objective;
use crate::graph::{Graph, NodeKey, Weight};

/// One hop of a path with the total accumulated so far
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathLeg<N, W> {
    pub from: N,
    pub to: N,
    pub weight: W,
    pub running_total: W,
}

/// Walks the predecessor links back from `target` and returns the path root-first.
///
/// Returns an empty path when the chain does not lead back to `source`.
pub fn reconstruct_path<N: NodeKey>(
    predecessors: &BTreeMap<N, Option<N>>,
    source: &N,
    target: &N,
) -> Vec<N> {
    let mut path = vec![target.clone()];
    let mut current = target;

    while current != source {
        match predecessors.get(current) {
            Some(Some(pred)) => {
                path.push(pred.clone());
                current = pred;
            }
            _ => return Vec::new(),
        }

        // Predecessor links of a finished search never loop
        if path.len() > predecessors.len() + 1 {
            warn!("predecessor chain from {} loops, discarding path", target);
            return Vec::new();
        }
    }

    path.reverse();
    path
}

/// Value of `path` under `objective`, or `None` if a hop is not an edge of the graph
pub fn path_value<N, W, G>(graph: &G, path: &[N], objective: Objective) -> Option<W>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    let first = path.first()?;
    if !graph.has_node(first) {
        return None;
    }
    path.windows(2).try_fold(objective.identity(), |value, hop| {
        let weight = graph.edge_weight(&hop[0], &hop[1])?;
        Some(objective.extend(value, weight))
    })
}

/// Sum of the edge weights along `path`
pub fn path_weight<N, W, G>(graph: &G, path: &[N]) -> Option<W>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    path_value(graph, path, Objective::MinimizeSum)
}

/// Breaks a path into hops with running totals, `None` if a hop is not an edge
pub fn path_legs<N, W, G>(graph: &G, path: &[N]) -> Option<Vec<PathLeg<N, W>>>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    let mut total = W::zero();
    path.windows(2)
        .map(|hop| {
            let weight = graph.edge_weight(&hop[0], &hop[1])?;
            total = total + weight;
            Some(PathLeg {
                from: hop[0].clone(),
                to: hop[1].clone(),
                weight,
                running_total: total,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators::demo_graph;

    fn ids(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reconstruct_path_follows_predecessors() {
        let predecessors: BTreeMap<&str, Option<&str>> = [
            ("A", None),
            ("B", Some("C")),
            ("C", Some("A")),
            ("D", None),
        ]
        .into_iter()
        .collect();

        assert_eq!(reconstruct_path(&predecessors, &"A", &"B"), vec!["A", "C", "B"]);
        assert_eq!(reconstruct_path(&predecessors, &"A", &"A"), vec!["A"]);
        assert!(reconstruct_path(&predecessors, &"A", &"D").is_empty());
    }

    #[test]
    fn test_reconstruct_path_rejects_loops() {
        let predecessors: BTreeMap<u32, Option<u32>> =
            [(0, None), (1, Some(2)), (2, Some(1))].into_iter().collect();
        assert!(reconstruct_path(&predecessors, &0, &1).is_empty());
    }

    #[test]
    fn test_path_value_per_objective() {
        let graph = demo_graph();
        let path = ids(&["A", "C", "B", "D", "E"]);
        assert_eq!(path_value(&graph, &path, Objective::MinimizeSum), Some(8.0));
        assert_eq!(path_value(&graph, &path, Objective::MinimizeMax), Some(3.0));
        assert_eq!(path_value(&graph, &ids(&["A", "E"]), Objective::MinimizeSum), None);
        assert_eq!(path_value(&graph, &ids(&["A"]), Objective::MinimizeSum), Some(0.0));
        assert_eq!(path_value::<String, f64, _>(&graph, &[], Objective::MinimizeSum), None);
    }

    #[test]
    fn test_path_legs_running_total() {
        let graph = demo_graph();
        let legs = path_legs(&graph, &ids(&["A", "C", "D"])).unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].weight, 2.0);
        assert_eq!(legs[1].to, "D");
        assert_eq!(legs[1].running_total, 8.0);
        assert!(path_legs(&graph, &ids(&["A", "D"])).is_none());
    }
}

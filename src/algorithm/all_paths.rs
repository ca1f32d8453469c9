//! Exhaustive simple-path enumeration.
//!
//! Depth-first search with backtracking over every loop-less path between two
//! nodes. The number of simple paths grows exponentially with the graph, so
//! every run is bounded by an [`EnumerationBudget`].

use std::cmp::Ordering;
use std::collections::HashSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeKey, Weight};
use crate::{Error, Result};

/// Limits for one enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationBudget {
    /// Maximum number of nodes pushed onto the DFS path
    pub max_expansions: usize,
    /// Maximum number of complete paths collected before ranking
    pub max_paths: Option<usize>,
}

impl Default for EnumerationBudget {
    fn default() -> Self {
        Self {
            max_expansions: 1_000_000,
            max_paths: None,
        }
    }
}

impl EnumerationBudget {
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = Some(max_paths);
        self
    }
}

/// A simple path and the sum of its edge weights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedPath<N, W> {
    pub path: Vec<N>,
    pub weight: W,
}

/// Returns the `k` heaviest simple paths from `source` to `target`, heaviest first.
///
/// Uses the default budget; see [`enumerate_top_k_paths_with_budget`].
pub fn enumerate_top_k_paths<N, W, G>(
    graph: &G,
    source: &N,
    target: &N,
    k: usize,
) -> Result<Vec<WeightedPath<N, W>>>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    enumerate_top_k_paths_with_budget(graph, source, target, k, EnumerationBudget::default())
}

/// Returns the `k` heaviest simple paths, failing with `BudgetExceeded`
/// instead of returning a partial ranking.
///
/// Paths of equal weight keep their discovery order.
pub fn enumerate_top_k_paths_with_budget<N, W, G>(
    graph: &G,
    source: &N,
    target: &N,
    k: usize,
    budget: EnumerationBudget,
) -> Result<Vec<WeightedPath<N, W>>>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    let mut paths = enumerate_simple_paths(graph, source, target, budget)?;
    paths.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    paths.truncate(k);
    Ok(paths)
}

/// Every simple path from `source` to `target` in discovery order
pub fn enumerate_simple_paths<N, W, G>(
    graph: &G,
    source: &N,
    target: &N,
    budget: EnumerationBudget,
) -> Result<Vec<WeightedPath<N, W>>>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    for endpoint in [source, target] {
        if !graph.has_node(endpoint) {
            return Err(Error::InvalidEndpoint(endpoint.to_string()));
        }
    }

    let mut walk = Walk {
        graph,
        target,
        budget,
        expansions: 0,
        path: Vec::new(),
        on_path: HashSet::new(),
        found: Vec::new(),
    };
    walk.run(source)?;

    debug!(
        "enumerated {} simple paths {} -> {} in {} expansions",
        walk.found.len(),
        source,
        target,
        walk.expansions
    );
    Ok(walk.found)
}

/// A node on the current DFS path and the edges still to try from it
struct Frame<'g, N, W> {
    neighbors: Box<dyn Iterator<Item = (&'g N, W)> + 'g>,
    weight: W,
}

struct Walk<'g, N, W, G> {
    graph: &'g G,
    target: &'g N,
    budget: EnumerationBudget,
    expansions: usize,
    path: Vec<N>,
    on_path: HashSet<N>,
    found: Vec<WeightedPath<N, W>>,
}

impl<'g, N, W, G> Walk<'g, N, W, G>
where
    N: NodeKey,
    W: Weight + 'g,
    G: Graph<N, W>,
{
    /// Depth-first walk with an explicit frame stack, so path length is
    /// bounded by memory rather than by the thread stack.
    fn run(&mut self, source: &N) -> Result<()> {
        let mut stack: Vec<Frame<'g, N, W>> = Vec::new();
        if let Some(frame) = self.enter(source.clone(), W::zero())? {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            match frame.neighbors.next() {
                Some((next, edge_weight)) => {
                    if self.on_path.contains(next) {
                        continue;
                    }
                    let weight = frame.weight + edge_weight;
                    if let Some(child) = self.enter(next.clone(), weight)? {
                        stack.push(child);
                    }
                }
                None => {
                    stack.pop();
                    self.leave();
                }
            }
        }
        Ok(())
    }

    /// Pushes `node` onto the path. Returns the frame to explore from it,
    /// or `None` when it is the target and has already been recorded.
    fn enter(&mut self, node: N, weight: W) -> Result<Option<Frame<'g, N, W>>> {
        self.expansions += 1;
        if self.expansions > self.budget.max_expansions {
            warn!("path enumeration stopped after {} expansions", self.budget.max_expansions);
            return Err(Error::BudgetExceeded {
                limit: self.budget.max_expansions,
            });
        }

        self.on_path.insert(node.clone());
        self.path.push(node);

        if self.path.last() == Some(self.target) {
            self.found.push(WeightedPath {
                path: self.path.clone(),
                weight,
            });
            if let Some(max_paths) = self.budget.max_paths {
                if self.found.len() > max_paths {
                    warn!("path enumeration stopped after {} paths", max_paths);
                    return Err(Error::BudgetExceeded { limit: max_paths });
                }
            }
            self.leave();
            return Ok(None);
        }

        let graph: &'g G = self.graph;
        let neighbors: Box<dyn Iterator<Item = (&'g N, W)> + 'g> = match self.path.last() {
            Some(node) => graph.neighbors(node),
            None => Box::new(std::iter::empty()),
        };
        Ok(Some(Frame { neighbors, weight }))
    }

    fn leave(&mut self) {
        if let Some(node) = self.path.pop() {
            self.on_path.remove(&node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Directedness, WeightedGraph};

    fn diamond() -> WeightedGraph<&'static str, f64> {
        WeightedGraph::from_edges(
            Directedness::Undirected,
            [("s", "a", 1.0), ("s", "b", 4.0), ("a", "t", 5.0), ("b", "t", 1.0), ("a", "b", 2.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_enumerates_every_simple_path() {
        let paths = enumerate_simple_paths(&diamond(), &"s", &"t", EnumerationBudget::default()).unwrap();
        assert_eq!(paths.len(), 4);
        for found in &paths {
            assert_eq!(found.path.first(), Some(&"s"));
            assert_eq!(found.path.last(), Some(&"t"));
            let unique: HashSet<_> = found.path.iter().collect();
            assert_eq!(unique.len(), found.path.len());
        }
    }

    #[test]
    fn test_budget_is_enforced() {
        let graph = diamond();
        let tight = EnumerationBudget::default().with_max_expansions(3);
        assert_eq!(
            enumerate_top_k_paths_with_budget(&graph, &"s", &"t", 2, tight),
            Err(Error::BudgetExceeded { limit: 3 })
        );
        let few_paths = EnumerationBudget::default().with_max_paths(1);
        assert!(matches!(
            enumerate_simple_paths(&graph, &"s", &"t", few_paths),
            Err(Error::BudgetExceeded { limit: 1 })
        ));
    }
}

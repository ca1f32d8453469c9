//! Generalized Dijkstra: one label-setting loop for every [`Objective`].
//!
//! The unvisited node with the best label is finalized at each iteration and
//! its edges to still-unvisited neighbors are relaxed. Ties go to the lowest
//! node id, which makes traces reproducible.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace, warn};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::algorithm::path::reconstruct_path;
use crate::algorithm::{
    LabelUpdate, Objective, PathSearchAlgorithm, SearchResult, SearchStats, SearchTree, StepRecord,
};
use crate::data_structures::MinQueue;
use crate::graph::{Graph, NodeKey, Weight};
use crate::{Error, Result};

/// Label-setting search for a fixed objective
#[derive(Debug, Clone, Copy)]
pub struct LabelSetting {
    objective: Objective,
    record_steps: bool,
}

impl LabelSetting {
    /// Creates a new search for the given objective, recording the step trace
    pub fn new(objective: Objective) -> Self {
        LabelSetting {
            objective,
            record_steps: true,
        }
    }

    /// Enables or disables the step trace.
    ///
    /// Each step snapshots every label, so a traced run over `n` nodes keeps
    /// O(n²) entries. Untraced runs return an empty `steps` list and the same
    /// labels, predecessors, path and stats.
    pub fn with_steps(mut self, record_steps: bool) -> Self {
        self.record_steps = record_steps;
        self
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn records_steps(&self) -> bool {
        self.record_steps
    }
}

impl<N, W, G> PathSearchAlgorithm<N, W, G> for LabelSetting
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    fn name(&self) -> &'static str {
        self.objective.name()
    }

    fn search(&self, graph: &G, source: &N, target: &N) -> Result<SearchResult<N, W>> {
        for endpoint in [source, target] {
            if !graph.has_node(endpoint) {
                return Err(Error::InvalidEndpoint(endpoint.to_string()));
            }
        }

        let run = Run::new(graph, source, self.objective, self.record_steps).execute(Some(target));
        let path = reconstruct_path(&run.predecessors, source, target);
        let value = if path.is_empty() {
            self.objective.sentinel()
        } else {
            run.labels
                .get(target)
                .copied()
                .unwrap_or_else(|| self.objective.sentinel())
        };

        debug!(
            "{} search {} -> {}: value {}, {} hops, {} iterations",
            self.objective,
            source,
            target,
            value,
            path.len().saturating_sub(1),
            run.iterations
        );

        Ok(SearchResult {
            source: source.clone(),
            target: target.clone(),
            objective: self.objective,
            value,
            path,
            labels: run.labels,
            predecessors: run.predecessors,
            steps: run.steps,
            stats: run.stats,
        })
    }

    fn search_tree(&self, graph: &G, source: &N) -> Result<SearchTree<N, W>> {
        if !graph.has_node(source) {
            return Err(Error::InvalidEndpoint(source.to_string()));
        }

        let run = Run::new(graph, source, self.objective, self.record_steps).execute(None);
        debug!(
            "{} search tree from {}: {} iterations",
            self.objective,
            source,
            run.iterations
        );

        Ok(SearchTree {
            source: source.clone(),
            objective: self.objective,
            labels: run.labels,
            predecessors: run.predecessors,
            steps: run.steps,
            stats: run.stats,
        })
    }
}

/// Searches from `source` to `target` under `objective`.
///
/// Fails with `InvalidEndpoint` if either node is absent. An unreachable
/// target is a normal result with an empty path and the sentinel value.
pub fn search<N, W, G>(graph: &G, source: &N, target: &N, objective: Objective) -> Result<SearchResult<N, W>>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    LabelSetting::new(objective).search(graph, source, target)
}

/// Finalizes every node reachable from `source` under `objective`
pub fn search_tree<N, W, G>(graph: &G, source: &N, objective: Objective) -> Result<SearchTree<N, W>>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    LabelSetting::new(objective).search_tree(graph, source)
}

/// Runs every objective on the same graph in parallel, in `Objective::ALL` order
pub fn compare_objectives<N, W, G>(graph: &G, source: &N, target: &N) -> Result<Vec<SearchResult<N, W>>>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W> + Sync,
{
    compare_objectives_with_steps(graph, source, target, true)
}

/// [`compare_objectives`] with the step trace switched on or off
pub fn compare_objectives_with_steps<N, W, G>(
    graph: &G,
    source: &N,
    target: &N,
    record_steps: bool,
) -> Result<Vec<SearchResult<N, W>>>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W> + Sync,
{
    Objective::ALL
        .as_slice()
        .par_iter()
        .map(|objective| {
            LabelSetting::new(*objective)
                .with_steps(record_steps)
                .search(graph, source, target)
        })
        .collect()
}

/// Mutable state of a single search
struct Run<'g, N, W, G>
where
    N: NodeKey,
    W: Weight,
{
    graph: &'g G,
    objective: Objective,
    source: N,
    labels: BTreeMap<N, W>,
    predecessors: BTreeMap<N, Option<N>>,
    unvisited: BTreeSet<N>,
    frontier: MinQueue<N, OrderedFloat<W>>,
    steps: Vec<StepRecord<N, W>>,
    record_steps: bool,
    iterations: usize,
    stats: SearchStats<N>,
}

impl<'g, N, W, G> Run<'g, N, W, G>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    fn new(graph: &'g G, source: &N, objective: Objective, record_steps: bool) -> Self {
        let sentinel = objective.sentinel();
        let mut labels: BTreeMap<N, W> = BTreeMap::new();
        let mut predecessors = BTreeMap::new();
        let mut unvisited = BTreeSet::new();
        let mut negative = false;

        for node in graph.nodes() {
            labels.insert(node.clone(), sentinel);
            predecessors.insert(node.clone(), None);
            unvisited.insert(node.clone());
            negative |= graph.neighbors(node).any(|(_, weight)| weight < W::zero());
        }
        if negative {
            warn!("graph has negative edge weights; {} labels may not be optimal", objective);
        }

        labels.insert(source.clone(), objective.identity());

        let mut run = Run {
            graph,
            objective,
            source: source.clone(),
            labels,
            predecessors,
            unvisited,
            frontier: MinQueue::new(),
            steps: Vec::new(),
            record_steps,
            iterations: 0,
            stats: SearchStats::default(),
        };
        run.enqueue(source.clone(), objective.identity());
        run.record(0, None, Vec::new());
        run
    }

    /// Frontier priority: labels are negated when larger is better so the
    /// min-queue always yields the best label, lowest id first.
    fn enqueue(&mut self, node: N, value: W) {
        let priority = if self.objective.maximizes() { -value } else { value };
        self.frontier.push(node, OrderedFloat(priority));
    }

    fn label(&self, node: &N) -> W {
        self.labels
            .get(node)
            .copied()
            .unwrap_or_else(|| self.objective.sentinel())
    }

    fn record(&mut self, iteration: usize, node: Option<N>, updates: Vec<LabelUpdate<N, W>>) {
        if !self.record_steps {
            return;
        }
        self.steps.push(StepRecord {
            iteration,
            node,
            values: self.labels.clone(),
            predecessors: self.predecessors.clone(),
            unvisited: self.unvisited.iter().cloned().collect(),
            updates,
        });
    }

    fn execute(mut self, target: Option<&N>) -> Self {
        if target == Some(&self.source) {
            return self;
        }

        // Each improvement pushes a fresh entry, so the first pop of a node
        // carries its final label and later pops are stale.
        while let Some((u, _)) = self.frontier.pop() {
            self.stats.frontier_pops += 1;
            if !self.unvisited.remove(&u) {
                continue;
            }
            self.iterations += 1;
            let iteration = self.iterations;

            if target == Some(&u) {
                trace!("iteration {}: target {} finalized", iteration, u);
                self.record(iteration, Some(u), Vec::new());
                break;
            }

            let updates = self.relax(&u);
            trace!(
                "iteration {}: finalized {} with {}, {} labels improved",
                iteration,
                u,
                self.label(&u),
                updates.len()
            );
            self.record(iteration, Some(u), updates);
        }

        self
    }

    fn relax(&mut self, u: &N) -> Vec<LabelUpdate<N, W>> {
        let value_u = self.label(u);
        let graph = self.graph;
        let mut updates = Vec::new();

        for (v, weight) in graph.neighbors(u) {
            if !self.unvisited.contains(v) {
                continue;
            }
            self.stats.relaxations += 1;

            let candidate = self.objective.extend(value_u, weight);
            let current = self.label(v);
            if self.objective.improves(candidate, current) {
                self.labels.insert(v.clone(), candidate);
                self.predecessors.insert(v.clone(), Some(u.clone()));
                *self.stats.update_counts.entry(v.clone()).or_insert(0) += 1;
                updates.push(LabelUpdate {
                    node: v.clone(),
                    old: current,
                    new: candidate,
                    via: u.clone(),
                });
                self.enqueue(v.clone(), candidate);
            }
        }

        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MutableGraph, WeightedGraph};

    #[test]
    fn test_step_trace_starts_with_initial_state() {
        let graph = WeightedGraph::from_edges(
            crate::graph::Directedness::Directed,
            [(1u32, 2u32, 4.0), (2, 3, 1.0)],
        )
        .unwrap();
        let result = search(&graph, &1, &3, Objective::MinimizeSum).unwrap();

        let initial = &result.steps[0];
        assert_eq!(initial.iteration, 0);
        assert_eq!(initial.node, None);
        assert_eq!(initial.values[&1], 0.0);
        assert_eq!(initial.values[&2], f64::INFINITY);
        assert_eq!(initial.unvisited, vec![1, 2, 3]);

        let nodes: Vec<_> = result.steps.iter().map(|s| s.node).collect();
        assert_eq!(nodes, vec![None, Some(1), Some(2), Some(3)]);
        assert!(result.steps.last().unwrap().updates.is_empty());
        assert_eq!(result.value, 5.0);
    }

    #[test]
    fn test_ties_finalize_lowest_id_first() {
        let mut graph: WeightedGraph<char, f64> = WeightedGraph::undirected();
        for id in ['s', 'x', 'b', 'a', 't'] {
            graph.add_node(id);
        }
        graph.add_edge('s', 'b', 1.0).unwrap();
        graph.add_edge('s', 'a', 1.0).unwrap();
        graph.add_edge('a', 't', 1.0).unwrap();
        graph.add_edge('b', 't', 1.0).unwrap();

        let result = search(&graph, &'s', &'t', Objective::MinimizeSum).unwrap();
        assert_eq!(result.steps[2].node, Some('a'));
        assert_eq!(result.path, vec!['s', 'a', 't']);
    }

    #[test]
    fn test_missing_endpoint_is_rejected() {
        let graph: WeightedGraph<u32, f64> =
            WeightedGraph::from_edges(crate::graph::Directedness::Undirected, [(0, 1, 1.0)]).unwrap();
        assert_eq!(
            search(&graph, &0, &9, Objective::MinimizeSum).unwrap_err(),
            Error::InvalidEndpoint("9".to_string())
        );
        assert!(search_tree(&graph, &7, Objective::MinimizeMax).is_err());
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algorithm::path::reconstruct_path;
use crate::graph::{Graph, NodeKey, Weight};
use crate::{Error, Result};

/// What a label-setting search optimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    /// Classic shortest path: minimize the sum of edge weights
    MinimizeSum,
    /// Greedy longest path: maximize the sum of edge weights
    MaximizeSum,
    /// Bottleneck path: minimize the heaviest edge on the path
    MinimizeMax,
}

impl Objective {
    pub const ALL: [Objective; 3] = [
        Objective::MinimizeSum,
        Objective::MaximizeSum,
        Objective::MinimizeMax,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Objective::MinimizeSum => "minimize-sum",
            Objective::MaximizeSum => "maximize-sum",
            Objective::MinimizeMax => "minimize-max",
        }
    }

    /// True when larger labels are better
    pub fn maximizes(&self) -> bool {
        matches!(self, Objective::MaximizeSum)
    }

    /// Label of a node that has not been reached
    pub fn sentinel<W: Weight>(&self) -> W {
        if self.maximizes() {
            W::neg_infinity()
        } else {
            W::infinity()
        }
    }

    /// Label of the source node. Zero is also the identity of max-of-edges
    /// because no edge has been traversed yet.
    pub fn identity<W: Weight>(&self) -> W {
        W::zero()
    }

    /// Label obtained by extending a path with label `value` by an edge of `weight`
    pub fn extend<W: Weight>(&self, value: W, weight: W) -> W {
        match self {
            Objective::MinimizeSum | Objective::MaximizeSum => value + weight,
            Objective::MinimizeMax => value.max(weight),
        }
    }

    /// True if `candidate` is strictly better than `current`
    pub fn improves<W: Weight>(&self, candidate: W, current: W) -> bool {
        if self.maximizes() {
            candidate > current
        } else {
            candidate < current
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Objective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "minimize-sum" | "min-sum" | "min" | "shortest" => Ok(Objective::MinimizeSum),
            "maximize-sum" | "max-sum" | "max" | "longest" => Ok(Objective::MaximizeSum),
            "minimize-max" | "min-max" | "minmax" | "bottleneck" => Ok(Objective::MinimizeMax),
            _ => Err(Error::InvalidObjective(s.to_string())),
        }
    }
}

/// A label improvement made while relaxing the edges of one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelUpdate<N, W> {
    pub node: N,
    pub old: W,
    pub new: W,
    pub via: N,
}

/// Snapshot of the search after one iteration.
///
/// Iteration 0 is the initial state and has no node. The trace is
/// observational only; the search never reads it back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord<N, W> {
    pub iteration: usize,
    /// Node finalized during this iteration
    pub node: Option<N>,
    pub values: BTreeMap<N, W>,
    pub predecessors: BTreeMap<N, Option<N>>,
    pub unvisited: Vec<N>,
    pub updates: Vec<LabelUpdate<N, W>>,
}

/// Counters collected during one search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchStats<N: Ord> {
    /// Frontier entries examined, stale ones included
    pub frontier_pops: usize,
    /// Edges evaluated against an unvisited neighbor
    pub relaxations: usize,
    /// How many times each node's label improved
    pub update_counts: BTreeMap<N, usize>,
}

impl<N: Ord> Default for SearchStats<N> {
    fn default() -> Self {
        SearchStats {
            frontier_pops: 0,
            relaxations: 0,
            update_counts: BTreeMap::new(),
        }
    }
}

/// Result of a source-to-target search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<N: Ord, W> {
    pub source: N,
    pub target: N,
    pub objective: Objective,
    /// Final label of the target; the objective's sentinel when unreachable
    pub value: W,
    /// Node sequence from source to target, empty when unreachable
    pub path: Vec<N>,
    pub labels: BTreeMap<N, W>,
    pub predecessors: BTreeMap<N, Option<N>>,
    pub steps: Vec<StepRecord<N, W>>,
    pub stats: SearchStats<N>,
}

impl<N: NodeKey, W: Weight> SearchResult<N, W> {
    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Labels of every node reachable from a source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchTree<N: Ord, W> {
    pub source: N,
    pub objective: Objective,
    pub labels: BTreeMap<N, W>,
    pub predecessors: BTreeMap<N, Option<N>>,
    pub steps: Vec<StepRecord<N, W>>,
    pub stats: SearchStats<N>,
}

impl<N: NodeKey, W: Weight> SearchTree<N, W> {
    /// Label of `node`, or the objective's sentinel if it was never reached
    pub fn value_of(&self, node: &N) -> W {
        self.labels
            .get(node)
            .copied()
            .unwrap_or_else(|| self.objective.sentinel())
    }

    pub fn is_reachable(&self, node: &N) -> bool {
        *node == self.source || self.predecessors.get(node).map_or(false, Option::is_some)
    }

    /// Path from the source to `target`, empty when unreachable
    pub fn path_to(&self, target: &N) -> Vec<N> {
        reconstruct_path(&self.predecessors, &self.source, target)
    }
}

/// Trait for path search algorithms
pub trait PathSearchAlgorithm<N, W, G>
where
    N: NodeKey,
    W: Weight,
    G: Graph<N, W>,
{
    /// Get the name of the algorithm
    fn name(&self) -> &'static str;

    /// Search from `source` until `target` is finalized or nothing is left to explore
    fn search(&self, graph: &G, source: &N, target: &N) -> Result<SearchResult<N, W>>;

    /// Search from `source` without a target, finalizing every reachable node
    fn search_tree(&self, graph: &G, source: &N) -> Result<SearchTree<N, W>>;
}

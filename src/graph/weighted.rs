use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::graph::traits::{Graph, MutableGraph, NodeKey, Weight};
use crate::{Error, Result};

/// Whether an edge can be walked in both directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Directedness {
    /// Edges go from source to target only
    Directed,
    /// Every edge is inserted into both adjacency directions
    #[default]
    Undirected,
}

/// A weighted graph implementation using adjacency lists
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedGraph<N, W>
where
    N: NodeKey,
    W: Weight,
{
    directedness: Directedness,

    /// Outgoing edges for each node: node -> [(target, weight)], in insertion order
    adjacency: BTreeMap<N, Vec<(N, W)>>,
}

impl<N, W> WeightedGraph<N, W>
where
    N: NodeKey,
    W: Weight,
{
    /// Creates a new empty graph
    pub fn new(directedness: Directedness) -> Self {
        WeightedGraph {
            directedness,
            adjacency: BTreeMap::new(),
        }
    }

    /// Creates a new empty directed graph
    pub fn directed() -> Self {
        Self::new(Directedness::Directed)
    }

    /// Creates a new empty undirected graph
    pub fn undirected() -> Self {
        Self::new(Directedness::Undirected)
    }

    /// Builds a graph from node ids and `(source, target, weight)` triples.
    ///
    /// Every edge endpoint must appear in `nodes`.
    pub fn from_parts<I, E>(directedness: Directedness, nodes: I, edges: E) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        E: IntoIterator<Item = (N, N, W)>,
    {
        let mut graph = Self::new(directedness);
        for node in nodes {
            graph.add_node(node);
        }
        for (from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        debug!(
            "built {:?} graph with {} nodes and {} edges",
            directedness,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Builds a graph whose node set is exactly the edge endpoints
    pub fn from_edges<E>(directedness: Directedness, edges: E) -> Result<Self>
    where
        E: IntoIterator<Item = (N, N, W)>,
    {
        let edges: Vec<_> = edges.into_iter().collect();
        let nodes: Vec<N> = edges
            .iter()
            .flat_map(|(from, to, _)| [from.clone(), to.clone()])
            .collect();
        Self::from_parts(directedness, nodes, edges)
    }

    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    /// Lists every edge once. Undirected edges are reported with the
    /// smaller id first.
    pub fn edges(&self) -> Vec<(N, N, W)> {
        let mut edges = Vec::new();
        for (from, targets) in &self.adjacency {
            for (to, weight) in targets {
                if self.directedness == Directedness::Undirected && to < from {
                    continue;
                }
                edges.push((from.clone(), to.clone(), *weight));
            }
        }
        edges
    }

    /// Validate that the graph doesn't have negative weights
    pub fn validate_non_negative(&self) -> bool {
        self.adjacency
            .values()
            .flatten()
            .all(|(_, weight)| *weight >= W::zero())
    }

    /// Returns a copy of the graph where every weight `w` becomes `ceiling - w`.
    ///
    /// Searching the inverted graph for a minimum sum favours heavy edges of
    /// the original graph. Fails if a weight exceeds `ceiling`.
    pub fn inverted(&self, ceiling: W) -> Result<Self> {
        let mut adjacency = BTreeMap::new();
        for (from, targets) in &self.adjacency {
            let mut inverted = Vec::with_capacity(targets.len());
            for (to, weight) in targets {
                if *weight > ceiling {
                    return Err(Error::InvalidWeight(format!(
                        "weight {} on {} -> {} exceeds inversion ceiling {}",
                        weight, from, to, ceiling
                    )));
                }
                inverted.push((to.clone(), ceiling - *weight));
            }
            adjacency.insert(from.clone(), inverted);
        }
        Ok(WeightedGraph {
            directedness: self.directedness,
            adjacency,
        })
    }

    fn insert_directed(&mut self, from: &N, to: &N, weight: W) {
        if let Some(outgoing) = self.adjacency.get_mut(from) {
            match outgoing.iter_mut().find(|(target, _)| target == to) {
                Some(edge) => edge.1 = weight,
                None => outgoing.push((to.clone(), weight)),
            }
        }
    }

    fn remove_directed(&mut self, from: &N, to: &N) -> bool {
        match self.adjacency.get_mut(from) {
            Some(outgoing) => {
                let len_before = outgoing.len();
                outgoing.retain(|(target, _)| target != to);
                len_before > outgoing.len()
            }
            None => false,
        }
    }

    fn check_weight(from: &N, to: &N, weight: W) -> Result<()> {
        if weight.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidWeight(format!(
                "weight {} on {} -> {} is not finite",
                weight, from, to
            )))
        }
    }
}

impl<N, W> Default for WeightedGraph<N, W>
where
    N: NodeKey,
    W: Weight,
{
    fn default() -> Self {
        Self::new(Directedness::default())
    }
}

impl<N, W> Graph<N, W> for WeightedGraph<N, W>
where
    N: NodeKey,
    W: Weight,
{
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn edge_count(&self) -> usize {
        let entries: usize = self.adjacency.values().map(|edges| edges.len()).sum();
        match self.directedness {
            Directedness::Directed => entries,
            Directedness::Undirected => {
                let loops = self
                    .adjacency
                    .iter()
                    .filter(|(node, edges)| edges.iter().any(|(target, _)| target == *node))
                    .count();
                (entries + loops) / 2
            }
        }
    }

    fn is_directed(&self) -> bool {
        self.directedness == Directedness::Directed
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &N> + '_> {
        Box::new(self.adjacency.keys())
    }

    fn neighbors(&self, node: &N) -> Box<dyn Iterator<Item = (&N, W)> + '_> {
        match self.adjacency.get(node) {
            Some(edges) => Box::new(edges.iter().map(|(target, weight)| (target, *weight))),
            None => Box::new(std::iter::empty()),
        }
    }

    fn has_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    fn edge_weight(&self, from: &N, to: &N) -> Option<W> {
        self.adjacency
            .get(from)?
            .iter()
            .find(|(target, _)| target == to)
            .map(|(_, weight)| *weight)
    }
}

impl<N, W> MutableGraph<N, W> for WeightedGraph<N, W>
where
    N: NodeKey,
    W: Weight,
{
    fn add_node(&mut self, node: N) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, Vec::new());
        true
    }

    fn remove_node(&mut self, node: &N) -> bool {
        if self.adjacency.remove(node).is_none() {
            return false;
        }
        for edges in self.adjacency.values_mut() {
            edges.retain(|(target, _)| target != node);
        }
        true
    }

    fn add_edge(&mut self, from: N, to: N, weight: W) -> Result<()> {
        for endpoint in [&from, &to] {
            if !self.has_node(endpoint) {
                return Err(Error::UnknownNode(endpoint.to_string()));
            }
        }
        Self::check_weight(&from, &to, weight)?;

        self.insert_directed(&from, &to, weight);
        if self.directedness == Directedness::Undirected && from != to {
            self.insert_directed(&to, &from, weight);
        }
        Ok(())
    }

    fn remove_edge(&mut self, from: &N, to: &N) -> bool {
        let removed = self.remove_directed(from, to);
        if self.directedness == Directedness::Undirected && from != to {
            self.remove_directed(to, from);
        }
        removed
    }

    fn update_edge_weight(&mut self, from: &N, to: &N, weight: W) -> Result<bool> {
        if !self.has_edge(from, to) {
            return Ok(false);
        }
        Self::check_weight(from, to, weight)?;

        self.insert_directed(from, to, weight);
        if self.directedness == Directedness::Undirected && from != to {
            self.insert_directed(to, from, weight);
        }
        Ok(true)
    }
}

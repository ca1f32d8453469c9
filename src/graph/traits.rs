use std::fmt::{Debug, Display};
use std::hash::Hash;

use num_traits::Float;

use crate::Result;

/// Identifier of a node. Strings and integers both qualify.
///
/// `Ord` is required so that every engine can break ties on the lowest id
/// and produce ordered, reproducible output.
pub trait NodeKey: Clone + Ord + Hash + Debug + Display + Send + Sync {}

impl<T> NodeKey for T where T: Clone + Ord + Hash + Debug + Display + Send + Sync {}

/// Numeric edge weight / label value
pub trait Weight: Float + Debug + Display + Send + Sync {}

impl<T> Weight for T where T: Float + Debug + Display + Send + Sync {}

/// Trait representing a weighted graph
pub trait Graph<N, W>: Debug
where
    N: NodeKey,
    W: Weight,
{
    /// Returns the number of nodes in the graph
    fn node_count(&self) -> usize;

    /// Returns the number of edges in the graph (an undirected edge counts once)
    fn edge_count(&self) -> usize;

    /// Returns true if edges only go from source to target
    fn is_directed(&self) -> bool;

    /// Returns an iterator over all nodes, ordered by id
    fn nodes(&self) -> Box<dyn Iterator<Item = &N> + '_>;

    /// Returns an iterator over the edges leaving a node, in insertion order
    fn neighbors(&self, node: &N) -> Box<dyn Iterator<Item = (&N, W)> + '_>;

    /// Returns true if the node exists in the graph
    fn has_node(&self, node: &N) -> bool;

    /// Gets the weight of an edge if it exists
    fn edge_weight(&self, from: &N, to: &N) -> Option<W>;

    /// Returns true if there's an edge between the two nodes
    fn has_edge(&self, from: &N, to: &N) -> bool {
        self.edge_weight(from, to).is_some()
    }
}

/// Trait for mutable graph operations
pub trait MutableGraph<N, W>: Graph<N, W>
where
    N: NodeKey,
    W: Weight,
{
    /// Adds a node. Returns false if it was already present.
    fn add_node(&mut self, node: N) -> bool;

    /// Removes a node and every edge touching it
    fn remove_node(&mut self, node: &N) -> bool;

    /// Adds an edge, replacing the weight of an existing edge between the same pair.
    ///
    /// Fails with `UnknownNode` if an endpoint is missing and with
    /// `InvalidWeight` if the weight is not finite.
    fn add_edge(&mut self, from: N, to: N, weight: W) -> Result<()>;

    /// Removes an edge from the graph
    fn remove_edge(&mut self, from: &N, to: &N) -> bool;

    /// Updates the weight of an existing edge. Returns false if there is no such edge.
    fn update_edge_weight(&mut self, from: &N, to: &N, weight: W) -> Result<bool>;
}

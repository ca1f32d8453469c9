pub mod traits;
pub mod weighted;
pub mod generators;

pub use traits::{Graph, MutableGraph, NodeKey, Weight};
pub use weighted::{Directedness, WeightedGraph};

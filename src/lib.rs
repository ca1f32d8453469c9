//! Path Engine - label-setting path search and critical path scheduling
//!
//! This library is the computational core behind a set of graph demos:
//!
//! * a single label-setting search parameterized by an [`Objective`]
//!   (minimum sum, maximum sum, or min-max "bottleneck" value),
//! * exhaustive enumeration of the heaviest simple paths between two nodes,
//! * critical path method (CPM) scheduling over a task-dependency DAG.
//!
//! Every engine is a pure function of its inputs. Graphs and task sets are
//! borrowed, never mutated, and results are fully populated on success.

pub mod algorithm;
pub mod data_structures;
pub mod graph;
pub mod schedule;
pub mod web;

pub use algorithm::{
    all_paths::{enumerate_top_k_paths, enumerate_top_k_paths_with_budget, EnumerationBudget, WeightedPath},
    label_setting::{compare_objectives, compare_objectives_with_steps, search, search_tree, LabelSetting},
    Objective, SearchResult, SearchTree, StepRecord,
};
/// Re-export main types for convenient use
pub use graph::{Directedness, WeightedGraph};
pub use schedule::{compute_schedule, ScheduleResult, Task, TaskSet};

/// Error types for the library
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid endpoint: node {0} is not in the graph")]
    InvalidEndpoint(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Invalid edge weight: {0}")]
    InvalidWeight(String),

    #[error("Task {task} references unknown predecessor {predecessor}")]
    UnknownPredecessor { task: String, predecessor: String },

    #[error("Duplicate task id: {0}")]
    DuplicateTask(String),

    #[error("Task {task} has invalid duration {duration}")]
    InvalidDuration { task: String, duration: String },

    #[error("Dependency cycle detected among tasks: {}", .0.join(", "))]
    CycleDetected(Vec<String>),

    #[error("Path enumeration exceeded its budget of {limit}")]
    BudgetExceeded { limit: usize },

    #[error("Unknown objective: {0}")]
    InvalidObjective(String),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::algorithm::all_paths::WeightedPath;
use crate::algorithm::{PathLeg, SearchResult, SearchStats, StepRecord};
use crate::graph::{Directedness, WeightedGraph};
use crate::schedule::{parse_predecessors, ScheduleResult, Task, TaskSet};
use crate::{Error, Objective, Result};

/// A node as sent by the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebNode {
    pub id: String,
}

/// An edge as sent by the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// A complete graph in request bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebGraph {
    #[serde(default)]
    pub directed: bool,
    /// Optional explicit node list. When empty, the nodes are the edge endpoints.
    #[serde(default)]
    pub nodes: Vec<WebNode>,
    #[serde(default)]
    pub edges: Vec<WebEdge>,
}

impl WebGraph {
    pub fn to_graph(&self) -> Result<WeightedGraph<String, f64>> {
        let directedness = if self.directed {
            Directedness::Directed
        } else {
            Directedness::Undirected
        };
        let edges = self
            .edges
            .iter()
            .map(|edge| (edge.source.clone(), edge.target.clone(), edge.weight));

        if self.nodes.is_empty() {
            WeightedGraph::from_edges(directedness, edges)
        } else {
            let nodes = self.nodes.iter().map(|node| node.id.clone());
            WeightedGraph::from_parts(directedness, nodes, edges)
        }
    }
}

/// Parameters for a single search
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub graph: WebGraph,
    pub source: String,
    pub target: String,
    #[serde(default = "default_objective")]
    pub objective: String,
    /// Include the step trace (only honoured for small graphs)
    #[serde(default = "default_trace")]
    pub trace: bool,
}

fn default_trace() -> bool {
    true
}

fn default_objective() -> String {
    Objective::MinimizeSum.name().to_string()
}

/// Parameters for running every objective on one graph
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub graph: WebGraph,
    pub source: String,
    pub target: String,
    #[serde(default = "default_trace")]
    pub trace: bool,
}

/// Parameters for top-K simple path enumeration
#[derive(Debug, Deserialize)]
pub struct TopPathsRequest {
    pub graph: WebGraph,
    pub source: String,
    pub target: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub max_expansions: Option<usize>,
}

fn default_k() -> usize {
    3
}

/// Predecessors given either as a list or as the text typed in a schedule table
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WebPredecessors {
    List(Vec<String>),
    Text(String),
}

impl Default for WebPredecessors {
    fn default() -> Self {
        WebPredecessors::List(Vec::new())
    }
}

/// A task row in request bodies
#[derive(Debug, Clone, Deserialize)]
pub struct WebTask {
    pub id: String,
    pub duration: f64,
    #[serde(default)]
    pub predecessors: WebPredecessors,
}

/// Parameters for a critical path computation
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub tasks: Vec<WebTask>,
}

impl ScheduleRequest {
    pub fn to_task_set(&self) -> Result<TaskSet<f64>> {
        TaskSet::from_tasks(self.tasks.iter().map(|task| {
            let predecessors = match &task.predecessors {
                WebPredecessors::List(list) => list.clone(),
                WebPredecessors::Text(text) => parse_predecessors(text),
            };
            Task::new(task.id.clone(), task.duration, predecessors)
        }))
    }
}

/// The outcome of one search, with unreachable labels as `null`
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub objective: Objective,
    pub source: String,
    pub target: String,
    pub reachable: bool,
    pub value: Option<f64>,
    pub path: Vec<String>,
    pub legs: Vec<PathLeg<String, f64>>,
    pub labels: BTreeMap<String, Option<f64>>,
    pub predecessors: BTreeMap<String, Option<String>>,
    pub steps: Vec<StepRecord<String, f64>>,
    pub stats: SearchStats<String>,
}

impl SearchOutcome {
    pub fn new(result: SearchResult<String, f64>, legs: Vec<PathLeg<String, f64>>) -> Self {
        let reachable = result.is_reachable();
        SearchOutcome {
            objective: result.objective,
            source: result.source,
            target: result.target,
            reachable,
            value: reachable.then_some(result.value),
            path: result.path,
            legs,
            labels: result
                .labels
                .into_iter()
                .map(|(node, value)| (node, value.is_finite().then_some(value)))
                .collect(),
            predecessors: result.predecessors,
            steps: result.steps,
            stats: result.stats,
        }
    }
}

/// Response of `POST /api/search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub execution_id: Uuid,
    pub execution_time_ms: f64,
    #[serde(flatten)]
    pub outcome: SearchOutcome,
}

/// Response of `POST /api/search/compare`
#[derive(Debug, Clone, Serialize)]
pub struct CompareResponse {
    pub execution_id: Uuid,
    pub execution_time_ms: f64,
    pub results: Vec<SearchOutcome>,
}

/// Response of `POST /api/paths/top`
#[derive(Debug, Clone, Serialize)]
pub struct TopPathsResponse {
    pub execution_id: Uuid,
    pub execution_time_ms: f64,
    pub k: usize,
    pub paths: Vec<WeightedPath<String, f64>>,
}

/// Response of `POST /api/schedule`
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub execution_id: Uuid,
    pub execution_time_ms: f64,
    #[serde(flatten)]
    pub schedule: ScheduleResult<f64>,
}

/// Error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Machine-readable code and optional structured details for an engine error
    pub fn from_error(err: &Error) -> Self {
        let (code, details) = match err {
            Error::InvalidEndpoint(node) => ("invalid_endpoint", Some(serde_json::json!({ "node": node }))),
            Error::UnknownNode(node) => ("unknown_node", Some(serde_json::json!({ "node": node }))),
            Error::InvalidWeight(_) => ("invalid_weight", None),
            Error::UnknownPredecessor { task, predecessor } => (
                "unknown_predecessor",
                Some(serde_json::json!({ "task": task, "predecessor": predecessor })),
            ),
            Error::DuplicateTask(task) => ("duplicate_task", Some(serde_json::json!({ "task": task }))),
            Error::InvalidDuration { task, .. } => ("invalid_duration", Some(serde_json::json!({ "task": task }))),
            Error::CycleDetected(tasks) => ("cycle_detected", Some(serde_json::json!({ "tasks": tasks }))),
            Error::BudgetExceeded { limit } => ("budget_exceeded", Some(serde_json::json!({ "limit": limit }))),
            Error::InvalidObjective(name) => ("invalid_objective", Some(serde_json::json!({ "objective": name }))),
        };
        ErrorResponse {
            error: code.to_string(),
            message: err.to_string(),
            details,
        }
    }
}

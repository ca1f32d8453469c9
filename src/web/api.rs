use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use log::{debug, info};
use std::time::Instant;
use uuid::Uuid;

use crate::algorithm::all_paths::{enumerate_top_k_paths_with_budget, EnumerationBudget};
use crate::algorithm::label_setting::{compare_objectives_with_steps, LabelSetting};
use crate::algorithm::path_legs;
use crate::algorithm::{PathSearchAlgorithm, SearchResult};
use crate::graph::{Graph, WeightedGraph};
use crate::schedule::compute_schedule;
use crate::web::models::*;
use crate::{Error, Objective};

/// Largest graph for which search responses carry the step trace.
/// Each step snapshots every label, so trace size grows with the square of the node count.
pub const MAX_TRACED_NODES: usize = 500;

/// Handler result: a JSON body or a status code with an [`ErrorResponse`]
pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Create the API router
pub fn create_router() -> Router {
    Router::new()
        .route("/api/search", post(run_search))
        .route("/api/search/compare", post(run_compare))
        .route("/api/paths/top", post(run_top_paths))
        .route("/api/schedule", post(run_schedule))
        .route("/api/health", get(health_check))
}

/// Malformed input is a 400, well-formed input the engines refuse is a 422
pub fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::InvalidObjective(_)
        | Error::InvalidWeight(_)
        | Error::UnknownNode(_)
        | Error::DuplicateTask(_)
        | Error::InvalidDuration { .. } => StatusCode::BAD_REQUEST,
        Error::InvalidEndpoint(_)
        | Error::UnknownPredecessor { .. }
        | Error::CycleDetected(_)
        | Error::BudgetExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn reject(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = error_status(&err);
    debug!("request rejected with {}: {}", status, err);
    (status, Json(ErrorResponse::from_error(&err)))
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn trace_enabled(requested: bool, graph: &WeightedGraph<String, f64>) -> bool {
    let enabled = requested && graph.node_count() <= MAX_TRACED_NODES;
    if requested && !enabled {
        info!(
            "step trace skipped for a graph of {} nodes (limit {})",
            graph.node_count(),
            MAX_TRACED_NODES
        );
    }
    enabled
}

fn outcome(graph: &WeightedGraph<String, f64>, result: SearchResult<String, f64>) -> SearchOutcome {
    let legs = path_legs(graph, result.path.as_slice()).unwrap_or_default();
    SearchOutcome::new(result, legs)
}

/// Run one objective between two nodes
pub async fn run_search(Json(request): Json<SearchRequest>) -> ApiResult<SearchResponse> {
    let start = Instant::now();
    let objective: Objective = request.objective.parse().map_err(reject)?;
    let graph = request.graph.to_graph().map_err(reject)?;

    let result = LabelSetting::new(objective)
        .with_steps(trace_enabled(request.trace, &graph))
        .search(&graph, &request.source, &request.target)
        .map_err(reject)?;
    let response = SearchResponse {
        execution_id: Uuid::new_v4(),
        execution_time_ms: elapsed_ms(start),
        outcome: outcome(&graph, result),
    };

    info!(
        "search {} {} -> {} finished in {:.3} ms",
        objective, request.source, request.target, response.execution_time_ms
    );
    Ok(Json(response))
}

/// Run every objective between the same two nodes
pub async fn run_compare(Json(request): Json<CompareRequest>) -> ApiResult<CompareResponse> {
    let start = Instant::now();
    let graph = request.graph.to_graph().map_err(reject)?;

    let record_steps = trace_enabled(request.trace, &graph);
    let results = compare_objectives_with_steps(&graph, &request.source, &request.target, record_steps)
        .map_err(reject)?;
    let results = results.into_iter().map(|result| outcome(&graph, result)).collect();
    let response = CompareResponse {
        execution_id: Uuid::new_v4(),
        execution_time_ms: elapsed_ms(start),
        results,
    };

    info!(
        "objective comparison {} -> {} finished in {:.3} ms",
        request.source, request.target, response.execution_time_ms
    );
    Ok(Json(response))
}

/// Rank the heaviest simple paths between two nodes
pub async fn run_top_paths(Json(request): Json<TopPathsRequest>) -> ApiResult<TopPathsResponse> {
    let start = Instant::now();
    let graph = request.graph.to_graph().map_err(reject)?;

    let mut budget = EnumerationBudget::default();
    if let Some(max_expansions) = request.max_expansions {
        budget = budget.with_max_expansions(max_expansions);
    }
    let paths = enumerate_top_k_paths_with_budget(&graph, &request.source, &request.target, request.k, budget)
        .map_err(reject)?;
    let response = TopPathsResponse {
        execution_id: Uuid::new_v4(),
        execution_time_ms: elapsed_ms(start),
        k: request.k,
        paths,
    };

    info!(
        "top {} paths {} -> {} finished in {:.3} ms",
        request.k, request.source, request.target, response.execution_time_ms
    );
    Ok(Json(response))
}

/// Compute dates, margins and the critical path of a task list
pub async fn run_schedule(Json(request): Json<ScheduleRequest>) -> ApiResult<ScheduleResponse> {
    let start = Instant::now();
    let tasks = request.to_task_set().map_err(reject)?;

    let schedule = compute_schedule(&tasks).map_err(reject)?;
    let response = ScheduleResponse {
        execution_id: Uuid::new_v4(),
        execution_time_ms: elapsed_ms(start),
        schedule,
    };

    info!(
        "schedule of {} tasks finished in {:.3} ms",
        tasks.len(),
        response.execution_time_ms
    );
    Ok(Json(response))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

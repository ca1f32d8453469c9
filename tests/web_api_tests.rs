use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use path_engine::web::{build_app, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn demo_graph_json() -> Value {
    json!({
        "edges": [
            {"source": "A", "target": "B", "weight": 5},
            {"source": "A", "target": "C", "weight": 2},
            {"source": "B", "target": "C", "weight": 1},
            {"source": "B", "target": "D", "weight": 3},
            {"source": "C", "target": "D", "weight": 6},
            {"source": "D", "target": "E", "weight": 2}
        ]
    })
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    let app = build_app(&ServerConfig::default());
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let app = build_app(&ServerConfig::default());
    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_search_endpoint() {
    let (status, body) = post(
        "/api/search",
        json!({"graph": demo_graph_json(), "source": "A", "target": "E", "objective": "minimize-max"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["objective"], "minimize-max");
    assert_eq!(body["value"], 3.0);
    assert_eq!(body["path"], json!(["A", "C", "B", "D", "E"]));
    assert_eq!(body["reachable"], true);
    assert!(body["execution_id"].is_string());
    assert!(body["execution_time_ms"].is_number());
    assert_eq!(body["steps"][0]["node"], Value::Null);
    assert_eq!(body["legs"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn test_search_unreachable_target_reports_null_value() {
    let mut graph = demo_graph_json();
    graph["nodes"] = json!([{"id": "A"}, {"id": "B"}, {"id": "C"}, {"id": "D"}, {"id": "E"}, {"id": "Z"}]);

    let (status, body) = post(
        "/api/search",
        json!({"graph": graph, "source": "A", "target": "Z", "objective": "minimize-sum"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reachable"], false);
    assert_eq!(body["value"], Value::Null);
    assert_eq!(body["labels"]["Z"], Value::Null);
    assert_eq!(body["path"], json!([]));
}

#[tokio::test]
async fn test_unknown_objective_is_bad_request() {
    let (status, body) = post(
        "/api/search",
        json!({"graph": demo_graph_json(), "source": "A", "target": "E", "objective": "fastest"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_objective");
}

#[tokio::test]
async fn test_missing_endpoint_is_unprocessable() {
    let (status, body) = post(
        "/api/search",
        json!({"graph": demo_graph_json(), "source": "A", "target": "Q"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_endpoint");
    assert_eq!(body["details"]["node"], "Q");
}

#[tokio::test]
async fn test_compare_endpoint() {
    let (status, body) = post(
        "/api/search/compare",
        json!({"graph": demo_graph_json(), "source": "A", "target": "E"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["objective"], "minimize-sum");
    assert_eq!(results[0]["value"], 8.0);
    assert_eq!(results[2]["value"], 3.0);
}

#[tokio::test]
async fn test_top_paths_endpoint() {
    let (status, body) = post(
        "/api/paths/top",
        json!({"graph": demo_graph_json(), "source": "A", "target": "E", "k": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_array().unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0]["path"], json!(["A", "B", "C", "D", "E"]));
    assert_eq!(paths[0]["weight"], 14.0);
}

#[tokio::test]
async fn test_top_paths_budget_is_unprocessable() {
    let (status, body) = post(
        "/api/paths/top",
        json!({"graph": demo_graph_json(), "source": "A", "target": "E", "k": 2, "max_expansions": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "budget_exceeded");
    assert_eq!(body["details"]["limit"], 2);
}

#[tokio::test]
async fn test_schedule_endpoint() {
    let (status, body) = post(
        "/api/schedule",
        json!({"tasks": [
            {"id": "a", "duration": 7, "predecessors": "-"},
            {"id": "b", "duration": 7, "predecessors": ["a"]},
            {"id": "c", "duration": 15, "predecessors": "b"}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project_duration"], 29.0);
    assert_eq!(body["critical_path"], json!(["a", "b", "c"]));
    assert_eq!(body["earliest"]["c"], 14.0);
    assert_eq!(body["rows"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_schedule_cycle_is_unprocessable() {
    let (status, body) = post(
        "/api/schedule",
        json!({"tasks": [
            {"id": "a", "duration": 1, "predecessors": ["b"]},
            {"id": "b", "duration": 1, "predecessors": ["a"]}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "cycle_detected");
    assert_eq!(body["details"]["tasks"], json!(["a", "b"]));
}

#[tokio::test]
async fn test_duplicate_task_is_bad_request() {
    let (status, body) = post(
        "/api/schedule",
        json!({"tasks": [
            {"id": "a", "duration": 1},
            {"id": "a", "duration": 2}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicate_task");
}

#[tokio::test]
async fn test_large_graph_search_omits_step_trace() {
    let n = path_engine::web::api::MAX_TRACED_NODES + 100;
    let edges: Vec<Value> = (0..n - 1)
        .map(|i| json!({"source": format!("n{}", i), "target": format!("n{}", i + 1), "weight": 1}))
        .collect();
    let graph = json!({"directed": true, "edges": edges});

    let (status, body) = post(
        "/api/search",
        json!({"graph": graph.clone(), "source": "n0", "target": format!("n{}", n - 1)}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["steps"], json!([]));
    assert_eq!(body["value"], (n - 1) as f64);

    let (status, body) = post(
        "/api/search/compare",
        json!({"graph": graph, "source": "n0", "target": format!("n{}", n - 1)}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert!(results.iter().all(|result| result["steps"] == json!([])));
}

#[tokio::test]
async fn test_trace_can_be_switched_off() {
    let (status, body) = post(
        "/api/search",
        json!({"graph": demo_graph_json(), "source": "A", "target": "E", "trace": false}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["steps"], json!([]));
    assert_eq!(body["value"], 8.0);
}

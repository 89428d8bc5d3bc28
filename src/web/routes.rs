//! HTTP routes for the dashboard
//!
//! Provides API endpoints for the layout, the binding table and chart
//! updates, plus static file serving for the page itself.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::warn;
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::bindings::{
    BindingTable, DispatchError, PAYLOAD_SLIDER, PIE_CHART, SCATTER_CHART, SITE_DROPDOWN,
    UpdateRequest, dispatch,
};
use crate::dataset::DatasetSummary;
use crate::layout::PageLayout;
use crate::selection::Bound;

use super::server::AppState;

/// Embedded static assets
#[derive(RustEmbed)]
#[folder = "web-assets/"]
struct Assets;

/// Frontend configuration
#[derive(Serialize)]
struct FrontendConfig {
    api_endpoint: Option<String>,
}

/// Query parameters for the proportion chart
#[derive(Deserialize)]
struct ProportionQuery {
    site: Option<String>,
}

/// Query parameters for the correlation chart
#[derive(Deserialize)]
struct CorrelationQuery {
    site: Option<String>,
    low: Option<f64>,
    high: Option<f64>,
}

/// Create API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/layout", get(get_layout))
        .route("/api/bindings", get(get_bindings))
        .route("/api/update", post(post_update))
        .route("/api/charts/proportion", get(get_proportion_chart))
        .route("/api/charts/correlation", get(get_correlation_chart))
        .route("/api/summary", get(get_summary))
        .route("/api/config", get(get_config))
        .route("/api/health", get(health_check))
}

/// Create static file routes
pub fn static_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index_html))
        .route("/{*path}", get(static_handler))
}

/// GET /api/layout - Returns the page layout tree
async fn get_layout(State(state): State<Arc<AppState>>) -> Json<PageLayout> {
    Json(state.layout.clone())
}

/// GET /api/bindings - Returns the control → chart binding table and trigger map
async fn get_bindings() -> Json<BindingTable> {
    Json(BindingTable::new())
}

/// POST /api/update - Runs the handler bound to an output
async fn post_update(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateRequest>,
) -> Response {
    run_update(&state, &request)
}

/// GET /api/charts/proportion?site= - Proportion chart without the binding protocol
async fn get_proportion_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProportionQuery>,
) -> Response {
    let request = UpdateRequest::new(PIE_CHART).with_input(SITE_DROPDOWN, optional(query.site));
    run_update(&state, &request)
}

/// GET /api/charts/correlation?site=&low=&high= - Correlation chart without the binding protocol
///
/// Either bound may be omitted; the missing side falls back to the dataset bound.
async fn get_correlation_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CorrelationQuery>,
) -> Response {
    let range = match (query.low, query.high) {
        (None, None) => Value::Null,
        (low, high) => {
            for (side, value) in [(Bound::Lower, low), (Bound::Upper, high)] {
                if let Some(v) = value.filter(|v| !v.is_finite()) {
                    let e = DispatchError::MalformedInput {
                        id: PAYLOAD_SLIDER,
                        reason: format!("{side} bound {v} is not finite"),
                    };
                    return error_response(SCATTER_CHART, e);
                }
            }
            json!([low, high])
        }
    };
    let request = UpdateRequest::new(SCATTER_CHART)
        .with_input(SITE_DROPDOWN, optional(query.site))
        .with_input(PAYLOAD_SLIDER, range);
    run_update(&state, &request)
}

fn optional(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

fn run_update(state: &AppState, request: &UpdateRequest) -> Response {
    match dispatch(&state.dataset, request) {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(&request.output, e),
    }
}

fn error_response(output: &str, e: DispatchError) -> Response {
    warn!("Rejected update for '{}': {}", output, e);
    let status = match e {
        DispatchError::UnknownOutput(_) => StatusCode::NOT_FOUND,
        DispatchError::MalformedInput { .. } => StatusCode::BAD_REQUEST,
    };
    (status, Json(json!({"error": e.to_string()}))).into_response()
}

/// GET /api/summary - Returns the dataset schema summary
async fn get_summary(State(state): State<Arc<AppState>>) -> Json<DatasetSummary> {
    Json(state.dataset.summary())
}

/// GET /api/config - Returns frontend configuration
async fn get_config(State(state): State<Arc<AppState>>) -> Json<FrontendConfig> {
    Json(FrontendConfig {
        api_endpoint: state.api_endpoint.clone(),
    })
}

/// GET /api/health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// GET / - Serve index.html
async fn index_html() -> impl IntoResponse {
    match Assets::get("index.html") {
        Some(content) => Html(content.data.into_owned()).into_response(),
        None => (StatusCode::NOT_FOUND, "index.html not found").into_response(),
    }
}

/// Static file handler for embedded assets
async fn static_handler(Path(path): Path<String>) -> impl IntoResponse {
    let path = path.trim_start_matches('/');

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("File not found: {}", path)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::dataset::{LaunchDataset, LaunchRecord, Outcome};
    use crate::web::server::router;

    fn app() -> Router {
        let dataset = LaunchDataset::from_records(vec![
            LaunchRecord::new("A", 1000.0, Outcome::Success, "FT"),
            LaunchRecord::new("B", 5000.0, Outcome::Failure, "FT"),
            LaunchRecord::new("A", 9000.0, Outcome::Success, "B4"),
        ])
        .unwrap();
        router(Arc::new(AppState::new(dataset, None)))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_layout_endpoint() {
        let (status, body) = send(get("/api/layout")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "SpaceX Launch Records Dashboard");
        assert_eq!(body["root"]["kind"], "container");
    }

    #[tokio::test]
    async fn test_bindings_endpoint() {
        let (status, body) = send(get("/api/bindings")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bindings"][0]["output"]["id"], PIE_CHART);
        assert_eq!(body["bindings"][1]["handler"], "correlation");
        assert_eq!(body["bindings"][1]["inputs"][1]["id"], PAYLOAD_SLIDER);
        assert_eq!(
            body["triggers"][SITE_DROPDOWN],
            json!([PIE_CHART, SCATTER_CHART])
        );
        assert_eq!(body["triggers"][PAYLOAD_SLIDER], json!([SCATTER_CHART]));
    }

    #[tokio::test]
    async fn test_update_endpoint() {
        let (status, body) = send(post_json(
            "/api/update",
            json!({
                "output": SCATTER_CHART,
                "inputs": {SITE_DROPDOWN: "ALL", PAYLOAD_SLIDER: [2000, 10000]}
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["output"], SCATTER_CHART);
        assert_eq!(body["warnings"], json!([]));
        let points: usize = body["figure"]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|trace| trace["x"].as_array().unwrap().len())
            .sum();
        assert_eq!(points, 2);
    }

    #[tokio::test]
    async fn test_update_unknown_output() {
        let (status, body) = send(post_json(
            "/api/update",
            json!({"output": "missing-chart", "inputs": {}}),
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("missing-chart"));
    }

    #[tokio::test]
    async fn test_update_malformed_input() {
        let (status, _) = send(post_json(
            "/api/update",
            json!({"output": SCATTER_CHART, "inputs": {PAYLOAD_SLIDER: "wide"}}),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_proportion_chart_endpoint() {
        let (status, body) = send(get("/api/charts/proportion?site=A")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["figure"]["layout"]["title"]["text"],
            "Total Success Launches for site A"
        );
        assert_eq!(body["figure"]["data"][0]["labels"], json!(["1"]));
    }

    #[tokio::test]
    async fn test_correlation_chart_missing_range_warns() {
        let (status, body) = send(get("/api/charts/correlation?site=B")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
        assert_eq!(body["figure"]["data"][0]["x"], json!([5000.0]));
    }

    #[tokio::test]
    async fn test_correlation_chart_low_bound_only() {
        let (status, body) = send(get("/api/charts/correlation?site=A&low=2000")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["figure"]["data"][0]["x"], json!([9000.0]));
        assert_eq!(
            body["warnings"],
            json!(["No upper payload bound selected, using 9000 kg"])
        );
        assert!(
            body["figure"]["layout"]["title"]["text"]
                .as_str()
                .unwrap()
                .ends_with("within range 2000 - 9000 kg")
        );
    }

    #[tokio::test]
    async fn test_correlation_chart_high_bound_only() {
        let (status, body) = send(get("/api/charts/correlation?site=A&high=5000")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["figure"]["data"][0]["x"], json!([1000.0]));
        assert_eq!(
            body["warnings"],
            json!(["No lower payload bound selected, using 1000 kg"])
        );
        assert!(
            body["figure"]["layout"]["title"]["text"]
                .as_str()
                .unwrap()
                .ends_with("within range 1000 - 5000 kg")
        );
    }

    #[tokio::test]
    async fn test_correlation_chart_rejects_non_finite_bound() {
        let (status, body) = send(get("/api/charts/correlation?low=NaN&high=5000")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("lower bound NaN is not finite"), "{error}");

        let (status, body) = send(get("/api/charts/correlation?low=0&high=inf")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("upper bound inf"));
    }

    #[tokio::test]
    async fn test_summary_and_health() {
        let (status, body) = send(get("/api/summary")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"], 3);
        assert_eq!(body["launches_per_site"]["A"], 2);

        let response = app().oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_script_follows_served_triggers() {
        let script = Assets::get("app.js").unwrap();
        let script = std::str::from_utf8(&script.data).unwrap();
        // controls are wired from the served trigger map, not a client-side copy
        assert!(script.contains("table.triggers[id]"));
        // a response that is no longer the latest for its output is dropped
        assert!(script.contains("if (latest[output] !== seq) return;"));
    }

    #[tokio::test]
    async fn test_index_served() {
        let response = app().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app().oneshot(get("/app.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.contains("javascript"));

        let response = app().oneshot(get("/missing.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

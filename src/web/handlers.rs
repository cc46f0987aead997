//! Request handlers.

use super::AppState;
use crate::error::BootstrapError;
use crate::tools;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

pub async fn custom_health() -> Json<Value> {
    info!("Custom health endpoint '/custom_health' was called.");
    Json(json!({
        "status": "healthy",
        "message": "gen-bootstrap custom health OK."
    }))
}

pub async fn agent_card(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "agent": state.agent.card(),
        "runtime": state.runtime,
    }))
}

pub async fn list_tools(State(state): State<AppState>) -> Json<Value> {
    let tools: Vec<Value> = state
        .tools
        .list_sorted()
        .into_iter()
        .map(|t| t.summary())
        .collect();
    Json(json!({ "tools": tools }))
}

pub async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> Response {
    let tool = match state.tools.get_or_error(&name) {
        Ok(tool) => tool.clone(),
        Err(e) => return error_response(e),
    };
    let runner = state.runner.clone();
    let result =
        tokio::task::spawn_blocking(move || tools::invoke_tool(&tool, &args, runner.as_ref())).await;
    match result {
        Ok(Ok(output)) => Json(json!({ "name": name, "output": output })).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("tool task failed: {}", e) })),
        )
            .into_response(),
    }
}

fn error_response(err: BootstrapError) -> Response {
    let status = match &err {
        BootstrapError::NotFound(_) => StatusCode::NOT_FOUND,
        BootstrapError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        BootstrapError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

//! Agent control endpoints.
//!
//! - POST /api/v1/agent/start
//! - POST /api/v1/agent/stop
//! - GET  /api/v1/agent/status

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use joseph_types::agent::AgentStatus;

use crate::http::handlers::{begin, elapsed_ms};
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AgentTransition {
    pub status: &'static str,
    pub is_running: bool,
}

pub async fn start_agent(State(state): State<AppState>) -> Json<ApiResponse<AgentTransition>> {
    let (request_id, start) = begin();
    let status = if state.agent.start() {
        "Agent started"
    } else {
        "Agent already running"
    };
    let data = AgentTransition {
        status,
        is_running: true,
    };
    Json(ApiResponse::success(data, request_id, elapsed_ms(start)))
}

pub async fn stop_agent(State(state): State<AppState>) -> Json<ApiResponse<AgentTransition>> {
    let (request_id, start) = begin();
    let status = if state.agent.stop() {
        "Agent stopped"
    } else {
        "Agent not running"
    };
    let data = AgentTransition {
        status,
        is_running: false,
    };
    Json(ApiResponse::success(data, request_id, elapsed_ms(start)))
}

pub async fn agent_status(State(state): State<AppState>) -> Json<ApiResponse<AgentStatus>> {
    let (request_id, start) = begin();
    Json(ApiResponse::success(state.agent.status(), request_id, elapsed_ms(start)))
}

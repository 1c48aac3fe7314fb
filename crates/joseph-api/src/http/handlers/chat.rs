//! Chat endpoints.
//!
//! - POST /api/v1/chat              - Persisted exchange (user turn + assistant turn)
//! - POST /api/v1/generate-response - Stateless reply from caller-supplied history
//!
//! `generate-response` speaks the web client's wire format in both
//! directions: the success body is a bare `{response, timestamp, outcome}`
//! object, not the envelope. Errors still use the envelope.
//!
//! Generation failures never surface here; they arrive as fallback replies
//! with `outcome.kind == "fallback"`.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use joseph_types::chat::{ChatExchange, ChatRequest, HistoryEntry, ReplyOutcome};

use crate::http::error::AppError;
use crate::http::handlers::{begin, elapsed_ms};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/chat - Send one message within a conversation.
///
/// Without `conversation_id` a conversation is created for `topic`.
pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatExchange>>, AppError> {
    let (request_id, start) = begin();

    let exchange = state.chat_service.send_message(body).await?;
    let conversation_id = exchange.conversation.id;

    let resp = ApiResponse::success(exchange, request_id, elapsed_ms(start))
        .with_link("conversation", &format!("/api/v1/conversations/{conversation_id}"))
        .with_link(
            "turns",
            &format!("/api/v1/conversations/{conversation_id}/turns"),
        );

    Ok(Json(resp))
}

/// Request body for the stateless endpoint.
///
/// Field names follow the web client: `context` carries the topic token and
/// `currentData` the structured snapshot.
#[derive(Debug, Deserialize)]
pub struct GenerateResponseRequest {
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
    #[serde(default, alias = "topic")]
    pub context: String,
    #[serde(default, rename = "currentData", alias = "current_data")]
    pub current_data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedResponse {
    pub response: String,
    pub timestamp: String,
    pub outcome: ReplyOutcome,
}

/// POST /api/v1/generate-response - Reply to the last user message in `messages`.
pub async fn generate_response(
    State(state): State<AppState>,
    Json(body): Json<GenerateResponseRequest>,
) -> Result<Json<GeneratedResponse>, AppError> {
    let reply = state
        .chat_service
        .generate_reply(&body.context, &body.messages, body.current_data.as_ref())
        .await?;

    let data = GeneratedResponse {
        response: reply.text,
        timestamp: chrono::Utc::now().to_rfc3339(),
        outcome: reply.outcome,
    };

    Ok(Json(data))
}

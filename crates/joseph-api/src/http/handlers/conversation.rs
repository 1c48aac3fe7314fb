//! Conversation HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/conversations            - Create a conversation
//! - GET    /api/v1/conversations            - List conversations (newest activity first)
//! - GET    /api/v1/conversations/{id}       - Get a single conversation
//! - DELETE /api/v1/conversations/{id}       - Delete a conversation and its turns
//! - GET    /api/v1/conversations/{id}/turns - Turns, oldest first

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use joseph_types::chat::{Conversation, ConversationTurn};
use joseph_types::topic::Topic;

use crate::http::error::AppError;
use crate::http::handlers::{begin, elapsed_ms, parse_uuid};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for conversation creation. Unknown topics become `general`.
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub topic: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Query parameters for conversation listing.
#[derive(Debug, Deserialize)]
pub struct ConversationListQuery {
    /// Only conversations with this topic. Must be a known token.
    pub topic: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

/// POST /api/v1/conversations
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(body): Json<CreateConversationRequest>,
) -> Result<Json<ApiResponse<Conversation>>, AppError> {
    let (request_id, start) = begin();

    let conversation = state
        .chat_service
        .create_conversation(Topic::from_token(&body.topic), body.title)
        .await?;
    let id = conversation.id;

    let resp = ApiResponse::success(conversation, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/conversations/{id}"))
        .with_link("turns", &format!("/api/v1/conversations/{id}/turns"));

    Ok(Json(resp))
}

/// GET /api/v1/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    Query(query): Query<ConversationListQuery>,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, AppError> {
    let (request_id, start) = begin();

    let topic = match query.topic.as_deref() {
        Some(token) => Some(
            Topic::parse(token)
                .ok_or_else(|| AppError::Validation(format!("Unknown topic: {token}")))?,
        ),
        None => None,
    };
    if query.limit < 0 || query.offset < 0 {
        return Err(AppError::Validation(
            "limit and offset must not be negative".to_string(),
        ));
    }

    let conversations = state
        .chat_service
        .list_conversations(topic, Some(query.limit), Some(query.offset))
        .await?;

    let resp = ApiResponse::success(conversations, request_id, elapsed_ms(start))
        .with_link("self", "/api/v1/conversations");

    Ok(Json(resp))
}

/// GET /api/v1/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Conversation>>, AppError> {
    let (request_id, start) = begin();
    let id = parse_uuid(&id)?;

    let conversation = state.chat_service.get_conversation(&id).await?;

    let resp = ApiResponse::success(conversation, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/conversations/{id}"))
        .with_link("turns", &format!("/api/v1/conversations/{id}/turns"));

    Ok(Json(resp))
}

/// DELETE /api/v1/conversations/{id}
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    let (request_id, start) = begin();
    let id = parse_uuid(&id)?;

    state.chat_service.delete_conversation(&id).await?;

    Ok(Json(ApiResponse::success(
        Deleted { deleted: true },
        request_id,
        elapsed_ms(start),
    )))
}

/// GET /api/v1/conversations/{id}/turns
pub async fn list_turns(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ConversationTurn>>>, AppError> {
    let (request_id, start) = begin();
    let id = parse_uuid(&id)?;

    let turns = state.chat_service.list_turns(&id).await?;

    let resp = ApiResponse::success(turns, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/conversations/{id}/turns"))
        .with_link("conversation", &format!("/api/v1/conversations/{id}"));

    Ok(Json(resp))
}

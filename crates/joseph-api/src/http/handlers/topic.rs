//! GET /api/v1/topics - the closed topic set.

use axum::Json;

use joseph_types::topic::{Topic, TopicInfo};

use crate::http::handlers::{begin, elapsed_ms};
use crate::http::response::ApiResponse;

pub async fn list_topics() -> Json<ApiResponse<Vec<TopicInfo>>> {
    let (request_id, start) = begin();
    let topics = Topic::ALL.into_iter().map(TopicInfo::from).collect();
    Json(ApiResponse::success(topics, request_id, elapsed_ms(start)).with_link("self", "/api/v1/topics"))
}

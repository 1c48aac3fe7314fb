//! HTTP request handlers for the REST API.

pub mod agent;
pub mod chat;
pub mod conversation;
pub mod topic;

use std::time::Instant;

use uuid::Uuid;

use crate::http::error::AppError;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// Request id and start instant for the envelope metadata.
pub(crate) fn begin() -> (String, Instant) {
    (Uuid::now_v7().to_string(), Instant::now())
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};

use joseph_types::error::ChatError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors raised by the chat service.
    Chat(ChatError),
    /// Malformed path or query input caught before the service is called.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    /// Machine-readable code and message for the envelope.
    fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AppError::Chat(ChatError::NotFound { entity, id }) => (
                "CONVERSATION_NOT_FOUND",
                format!("{entity} '{id}' not found"),
            ),
            AppError::Chat(ChatError::Validation(msg)) | AppError::Validation(msg) => {
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::Store(e)) => ("STORE_ERROR", e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.code_and_message();
        if code == "STORE_ERROR" {
            tracing::error!(error = %message, "Request failed on store error");
        }
        ApiResponse::error(code, &message, String::new(), 0).into_response()
    }
}

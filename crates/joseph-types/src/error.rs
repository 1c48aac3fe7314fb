use thiserror::Error;

/// Errors from repository operations (used by trait definitions in joseph-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the chat service.
///
/// Generation failures never appear here: they are recovered with a
/// fallback reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("store failure: {0}")]
    Store(#[from] RepositoryError),
}

impl ChatError {
    pub fn conversation_not_found(id: impl ToString) -> Self {
        ChatError::NotFound {
            entity: "conversation",
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_not_found_names_entity() {
        let err = ChatError::conversation_not_found("abc");
        assert_eq!(err.to_string(), "conversation 'abc' not found");
    }

    #[test]
    fn test_store_error_from_repository() {
        let err: ChatError = RepositoryError::Connection.into();
        assert!(matches!(err, ChatError::Store(RepositoryError::Connection)));
    }
}

//! ConversationRepository trait definition.
//!
//! Provides persistence for conversations and their append-only turns.

use joseph_types::chat::{Conversation, ConversationTurn};
use joseph_types::error::RepositoryError;
use joseph_types::topic::Topic;
use uuid::Uuid;

/// Repository trait for conversation and turn persistence.
///
/// Implementations live in joseph-infra (e.g., `SqliteConversationRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ConversationRepository: Send + Sync {
    /// Create a new conversation.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by its unique ID.
    fn get_conversation(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List conversations, optionally filtered by topic, ordered by updated_at DESC.
    fn list_conversations(
        &self,
        topic: Option<Topic>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Delete a conversation and all of its turns.
    ///
    /// Returns `RepositoryError::NotFound` if the conversation does not exist.
    fn delete_conversation(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append one turn to its conversation and return the stored turn.
    ///
    /// Atomic per turn: the insert, the `updated_at` refresh, and the lazily
    /// derived title land together or not at all. `created_at` is raised to
    /// the conversation's latest turn timestamp when it is older, so turns
    /// list in append order even if the wall clock steps back. Returns
    /// `RepositoryError::NotFound` if the conversation does not exist.
    fn append_turn(
        &self,
        turn: &ConversationTurn,
    ) -> impl std::future::Future<Output = Result<ConversationTurn, RepositoryError>> + Send;

    /// All turns of a conversation, ordered by created_at ASC.
    fn list_turns(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationTurn>, RepositoryError>> + Send;

    /// Number of turns in a conversation.
    fn count_turns(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}

//! Conversation and turn types for Joseph.
//!
//! These types model chat conversations between a user and the assistant:
//! conversations scoped to a topic, the turns exchanged within them, and the
//! request/response shapes of a single chat exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::llm::MessageRole;
use crate::topic::Topic;

/// Who produced a turn. Only two origins exist on the conversation side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

impl From<TurnRole> for MessageRole {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => MessageRole::User,
            TurnRole::Assistant => MessageRole::Assistant,
        }
    }
}

/// A dialogue scoped to one topic.
///
/// `updated_at` moves forward every time a turn is appended. `title` is
/// filled in from the topic on the first appended turn when it was not
/// supplied at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub topic: Topic,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// A fresh conversation with no turns yet.
    pub fn new(topic: Topic, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            topic,
            title,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single immutable message within a conversation.
///
/// Turns are ordered by `created_at` within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: TurnRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(conversation_id: Uuid, role: TurnRole, text: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            role,
            text,
            created_at: Utc::now(),
        }
    }
}

/// Inbound chat request.
///
/// Either targets an existing conversation via `conversation_id`, or
/// implicitly creates one for `topic`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Free-form structured data shown on the user's current dashboard page.
    #[serde(default)]
    pub current_data: Option<serde_json::Value>,
}

/// How the assistant reply was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyOutcome {
    /// The generation service returned usable text.
    Generated,
    /// The generation attempt failed; the topic fallback text was used.
    Fallback { reason: String },
}

/// Result of one chat exchange: the two persisted turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    pub conversation: Conversation,
    pub user_turn: ConversationTurn,
    pub assistant_turn: ConversationTurn,
    pub outcome: ReplyOutcome,
}

/// A caller-supplied history entry for stateless reply generation.
///
/// Mirrors the `{type, content}` shape the dashboard frontend sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type", alias = "role")]
    pub role: TurnRole,
    pub content: String,
}

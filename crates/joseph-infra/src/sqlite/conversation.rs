//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `joseph-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader pool for
//! SELECTs, writer pool (and a transaction per appended turn) for writes.

use chrono::{DateTime, SecondsFormat, Utc};
use joseph_core::chat::repository::ConversationRepository;
use joseph_types::chat::{Conversation, ConversationTurn, TurnRole};
use joseph_types::error::RepositoryError;
use joseph_types::topic::Topic;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
#[derive(Clone)]
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    topic: String,
    title: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            topic: row.try_get("topic")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;
        let topic = parse_topic(&self.topic)?;

        Ok(Conversation {
            id,
            topic,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct TurnRow {
    id: String,
    conversation_id: String,
    role: String,
    text: String,
    created_at: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            text: row.try_get("text")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<ConversationTurn, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid turn id: {e}")))?;
        let conversation_id = Uuid::parse_str(&self.conversation_id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation_id: {e}")))?;
        let role: TurnRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ConversationTurn {
            id,
            conversation_id,
            role,
            text: self.text,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_topic(s: &str) -> Result<Topic, RepositoryError> {
    Topic::parse(s).ok_or_else(|| RepositoryError::Query(format!("invalid topic: '{s}'")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width so that string comparison in SQL matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

// ---------------------------------------------------------------------------
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO conversations (id, topic, title, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(conversation.id.to_string())
        .bind(conversation.topic.as_str())
        .bind(&conversation.title)
        .bind(format_datetime(&conversation.created_at))
        .bind(format_datetime(&conversation.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("UNIQUE") {
                    return RepositoryError::Conflict(format!(
                        "conversation {} already exists",
                        conversation.id
                    ));
                }
            }
            query_err(e)
        })?;

        Ok(conversation.clone())
    }

    async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row).map_err(query_err)?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_conversations(
        &self,
        topic: Option<Topic>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM conversations");
        if topic.is_some() {
            sql.push_str(" WHERE topic = ?");
        }
        sql.push_str(" ORDER BY updated_at DESC, id DESC");

        // SQLite requires LIMIT before OFFSET; -1 means unbounded.
        if limit.is_some() || offset.is_some() {
            sql.push_str(&format!(" LIMIT {}", limit.unwrap_or(-1)));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let mut query = sqlx::query(&sql);
        if let Some(topic) = topic {
            query = query.bind(topic.as_str());
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let conversation_row = ConversationRow::from_row(row).map_err(query_err)?;
            conversations.push(conversation_row.into_conversation()?);
        }

        Ok(conversations)
    }

    async fn delete_conversation(&self, id: &Uuid) -> Result<(), RepositoryError> {
        // Turns go with it through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn append_turn(&self, turn: &ConversationTurn) -> Result<ConversationTurn, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let row = sqlx::query("SELECT topic FROM conversations WHERE id = ?")
            .bind(turn.conversation_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_err)?;
        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };
        let topic: String = row.try_get("topic").map_err(query_err)?;
        let topic = parse_topic(&topic)?;

        // Fixed-width timestamps compare lexically, so MAX() is the latest turn.
        let latest: Option<String> = sqlx::query_scalar(
            "SELECT MAX(created_at) FROM conversation_turns WHERE conversation_id = ?",
        )
        .bind(turn.conversation_id.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(query_err)?;

        let mut created_at = format_datetime(&turn.created_at);
        if let Some(latest) = latest {
            if latest > created_at {
                created_at = latest;
            }
        }

        sqlx::query(
            r#"INSERT INTO conversation_turns (id, conversation_id, role, text, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(turn.id.to_string())
        .bind(turn.conversation_id.to_string())
        .bind(turn.role.to_string())
        .bind(&turn.text)
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("UNIQUE") {
                    return RepositoryError::Conflict(format!("turn {} already exists", turn.id));
                }
            }
            query_err(e)
        })?;

        // Refresh updated_at and fill the title lazily from the topic.
        sqlx::query(
            r#"UPDATE conversations
               SET updated_at = MAX(updated_at, ?), title = COALESCE(title, ?)
               WHERE id = ?"#,
        )
        .bind(&created_at)
        .bind(topic.display_name())
        .bind(turn.conversation_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;

        Ok(ConversationTurn {
            created_at: parse_datetime(&created_at)?,
            ..turn.clone()
        })
    }

    async fn list_turns(&self, conversation_id: &Uuid) -> Result<Vec<ConversationTurn>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conversation_turns WHERE conversation_id = ? ORDER BY created_at ASC, seq ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row = TurnRow::from_row(row).map_err(query_err)?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(turns)
    }

    async fn count_turns(&self, conversation_id: &Uuid) -> Result<u32, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM conversation_turns WHERE conversation_id = ?")
            .bind(conversation_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let count: i64 = row.try_get("cnt").map_err(query_err)?;

        Ok(count as u32)
    }
}

//! Process-local `ConversationRepository`.

use std::collections::HashMap;

use joseph_types::chat::{Conversation, ConversationTurn};
use joseph_types::error::RepositoryError;
use joseph_types::topic::Topic;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::ConversationRepository;

#[derive(Default)]
struct Inner {
    conversations: HashMap<Uuid, Conversation>,
    turns: HashMap<Uuid, Vec<ConversationTurn>>,
}

/// A process-local conversation store guarded by a single lock, so each
/// append is atomic.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    inner: RwLock<Inner>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationRepository for InMemoryConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.conversations.contains_key(&conversation.id) {
            return Err(RepositoryError::Conflict(format!(
                "conversation {} already exists",
                conversation.id
            )));
        }
        inner
            .conversations
            .insert(conversation.id, conversation.clone());
        inner.turns.insert(conversation.id, Vec::new());
        Ok(conversation.clone())
    }

    async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self.inner.read().await.conversations.get(id).cloned())
    }

    async fn list_conversations(
        &self,
        topic: Option<Topic>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let inner = self.inner.read().await;
        let mut conversations: Vec<Conversation> = inner
            .conversations
            .values()
            .filter(|c| topic.is_none_or(|t| c.topic == t))
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let offset = offset.unwrap_or(0).max(0) as usize;
        let limit = limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(conversations.into_iter().skip(offset).take(limit).collect())
    }

    async fn delete_conversation(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.conversations.remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        inner.turns.remove(id);
        Ok(())
    }

    async fn append_turn(&self, turn: &ConversationTurn) -> Result<ConversationTurn, RepositoryError> {
        let mut inner = self.inner.write().await;
        let Inner {
            conversations,
            turns,
        } = &mut *inner;
        let Some(conversation) = conversations.get_mut(&turn.conversation_id) else {
            return Err(RepositoryError::NotFound);
        };

        let history = turns.entry(turn.conversation_id).or_default();
        let mut stored = turn.clone();
        if let Some(latest) = history.last() {
            stored.created_at = stored.created_at.max(latest.created_at);
        }

        if stored.created_at > conversation.updated_at {
            conversation.updated_at = stored.created_at;
        }
        if conversation.title.is_none() {
            conversation.title = Some(conversation.topic.display_name().to_string());
        }
        history.push(stored.clone());
        Ok(stored)
    }

    async fn list_turns(&self, conversation_id: &Uuid) -> Result<Vec<ConversationTurn>, RepositoryError> {
        let inner = self.inner.read().await;
        // Appends keep timestamps non-decreasing, so insertion order is creation order.
        Ok(inner.turns.get(conversation_id).cloned().unwrap_or_default())
    }

    async fn count_turns(&self, conversation_id: &Uuid) -> Result<u32, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .turns
            .get(conversation_id)
            .map(|t| t.len() as u32)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joseph_types::chat::TurnRole;

    #[tokio::test]
    async fn test_append_sets_title_and_updated_at() {
        let repo = InMemoryConversationRepository::new();
        let conversation = repo
            .create_conversation(&Conversation::new(Topic::LoanFunding, None))
            .await
            .unwrap();

        let turn = ConversationTurn::new(conversation.id, TurnRole::User, "hi".to_string());
        repo.append_turn(&turn).await.unwrap();

        let stored = repo.get_conversation(&conversation.id).await.unwrap().unwrap();
        assert_eq!(stored.title.as_deref(), Some("Loan & Funding"));
        assert!(stored.updated_at >= turn.created_at);
        assert_eq!(repo.count_turns(&conversation.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_append_clamps_backward_clock() {
        let repo = InMemoryConversationRepository::new();
        let conversation = repo
            .create_conversation(&Conversation::new(Topic::General, None))
            .await
            .unwrap();

        let user = repo
            .append_turn(&ConversationTurn::new(conversation.id, TurnRole::User, "q".to_string()))
            .await
            .unwrap();
        let mut reply = ConversationTurn::new(conversation.id, TurnRole::Assistant, "a".to_string());
        reply.created_at = user.created_at - chrono::Duration::milliseconds(2);
        let stored = repo.append_turn(&reply).await.unwrap();

        assert_eq!(stored.created_at, user.created_at);
        let roles: Vec<TurnRole> = repo
            .list_turns(&conversation.id)
            .await
            .unwrap()
            .iter()
            .map(|t| t.role)
            .collect();
        assert_eq!(roles, vec![TurnRole::User, TurnRole::Assistant]);
    }

    #[tokio::test]
    async fn test_append_to_missing_conversation() {
        let repo = InMemoryConversationRepository::new();
        let turn = ConversationTurn::new(Uuid::now_v7(), TurnRole::User, "hi".to_string());
        assert!(matches!(
            repo.append_turn(&turn).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_turns() {
        let repo = InMemoryConversationRepository::new();
        let conversation = repo
            .create_conversation(&Conversation::new(Topic::General, None))
            .await
            .unwrap();
        repo.append_turn(&ConversationTurn::new(conversation.id, TurnRole::User, "x".to_string()))
            .await
            .unwrap();

        repo.delete_conversation(&conversation.id).await.unwrap();
        assert!(repo.get_conversation(&conversation.id).await.unwrap().is_none());
        assert!(repo.list_turns(&conversation.id).await.unwrap().is_empty());
        assert!(matches!(
            repo.delete_conversation(&conversation.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_topic() {
        let repo = InMemoryConversationRepository::new();
        repo.create_conversation(&Conversation::new(Topic::TaxCompliance, None))
            .await
            .unwrap();
        repo.create_conversation(&Conversation::new(Topic::MarketAnalysis, None))
            .await
            .unwrap();

        let all = repo.list_conversations(None, None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        let tax = repo
            .list_conversations(Some(Topic::TaxCompliance), None, None)
            .await
            .unwrap();
        assert_eq!(tax.len(), 1);
        assert_eq!(tax[0].topic, Topic::TaxCompliance);
    }
}

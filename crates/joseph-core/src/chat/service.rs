//! Chat service orchestrating one exchange end to end.
//!
//! ChatService coordinates the ConversationRepository, the topic resolver,
//! the PromptAssembler, and the ResponseReconciler. For every request that
//! passes validation it persists exactly one user turn before the generation
//! call and exactly one assistant turn after it.

use joseph_types::chat::{
    ChatExchange, ChatRequest, Conversation, ConversationTurn, HistoryEntry, TurnRole,
};
use joseph_types::config::{GenerationConfig, HistoryConfig};
use joseph_types::error::{ChatError, RepositoryError};
use joseph_types::topic::Topic;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::prompt::PromptAssembler;
use crate::chat::reconciler::{Reply, ResponseReconciler};
use crate::chat::repository::ConversationRepository;
use crate::chat::topic::instruction_for;
use crate::llm::box_provider::BoxLlmProvider;

/// Orchestrates conversations and reply generation.
///
/// Generic over `ConversationRepository` to maintain clean architecture
/// (joseph-core never depends on joseph-infra). The generation client is
/// injected, never global.
pub struct ChatService<R: ConversationRepository> {
    repo: R,
    provider: BoxLlmProvider,
    assembler: PromptAssembler,
    reconciler: ResponseReconciler,
}

impl<R: ConversationRepository> ChatService<R> {
    pub fn new(
        repo: R,
        provider: BoxLlmProvider,
        assembler: PromptAssembler,
        reconciler: ResponseReconciler,
    ) -> Self {
        Self {
            repo,
            provider,
            assembler,
            reconciler,
        }
    }

    /// Build a service from the `[generation]` and `[history]` config sections.
    pub fn from_config(
        repo: R,
        provider: BoxLlmProvider,
        generation: &GenerationConfig,
        history: HistoryConfig,
    ) -> Self {
        Self::new(
            repo,
            provider,
            PromptAssembler::new(history),
            ResponseReconciler::from_config(generation),
        )
    }

    /// Access the conversation repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Access the generation provider.
    pub fn provider(&self) -> &BoxLlmProvider {
        &self.provider
    }

    // --- Conversations ---

    pub async fn create_conversation(
        &self,
        topic: Topic,
        title: Option<String>,
    ) -> Result<Conversation, ChatError> {
        let title = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let conversation = self
            .repo
            .create_conversation(&Conversation::new(topic, title))
            .await?;
        info!(conversation_id = %conversation.id, topic = %topic, "Conversation created");
        Ok(conversation)
    }

    /// Get a conversation, or `ChatError::NotFound`.
    pub async fn get_conversation(&self, id: &Uuid) -> Result<Conversation, ChatError> {
        self.repo
            .get_conversation(id)
            .await?
            .ok_or_else(|| ChatError::conversation_not_found(id))
    }

    pub async fn list_conversations(
        &self,
        topic: Option<Topic>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.repo.list_conversations(topic, limit, offset).await?)
    }

    /// Delete a conversation together with its turns.
    pub async fn delete_conversation(&self, id: &Uuid) -> Result<(), ChatError> {
        match self.repo.delete_conversation(id).await {
            Ok(()) => {
                info!(conversation_id = %id, "Conversation deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(ChatError::conversation_not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    // --- Turns ---

    /// Turns of an existing conversation, oldest first.
    pub async fn list_turns(&self, conversation_id: &Uuid) -> Result<Vec<ConversationTurn>, ChatError> {
        self.get_conversation(conversation_id).await?;
        Ok(self.repo.list_turns(conversation_id).await?)
    }

    /// Append one turn to an existing conversation.
    pub async fn append_turn(
        &self,
        conversation_id: &Uuid,
        role: TurnRole,
        text: String,
    ) -> Result<ConversationTurn, ChatError> {
        let turn = ConversationTurn::new(*conversation_id, role, text);
        match self.repo.append_turn(&turn).await {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::NotFound) => Err(ChatError::conversation_not_found(conversation_id)),
            Err(e) => Err(e.into()),
        }
    }

    // --- Exchanges ---

    /// Handle one inbound chat message.
    ///
    /// Validation happens before any write. After the user turn is stored the
    /// exchange always completes with an assistant turn; only store failures
    /// are returned as errors.
    pub async fn send_message(&self, request: ChatRequest) -> Result<ChatExchange, ChatError> {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(ChatError::Validation("content must not be empty".to_string()));
        }
        let topic_token = request
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let mut conversation = match request.conversation_id {
            Some(id) => self.get_conversation(&id).await?,
            None => {
                let Some(token) = topic_token else {
                    return Err(ChatError::Validation(
                        "topic is required when conversation_id is absent".to_string(),
                    ));
                };
                self.create_conversation(Topic::from_token(token), None).await?
            }
        };

        let topic = topic_token.map_or(conversation.topic, Topic::from_token);
        let instruction = instruction_for(topic);
        let prior = self.repo.list_turns(&conversation.id).await?;

        let user_turn = self
            .append_turn(&conversation.id, TurnRole::User, content.to_string())
            .await?;

        let messages = self.assembler.assemble(
            &instruction,
            &prior,
            request.current_data.as_ref(),
            &user_turn.text,
        );
        debug!(
            conversation_id = %conversation.id,
            prior_turns = prior.len(),
            sent_messages = messages.len(),
            "Prompt assembled"
        );

        let reply = self.reconciler.reconcile(&self.provider, messages, topic).await;

        let assistant_turn = self
            .append_turn(&conversation.id, TurnRole::Assistant, reply.text)
            .await?;

        conversation.updated_at = conversation.updated_at.max(assistant_turn.created_at);
        if conversation.title.is_none() {
            conversation.title = Some(conversation.topic.display_name().to_string());
        }

        Ok(ChatExchange {
            conversation,
            user_turn,
            assistant_turn,
            outcome: reply.outcome,
        })
    }

    /// Produce a reply from caller-supplied history without persisting anything.
    ///
    /// The last history entry is the message being answered and must come
    /// from the user.
    pub async fn generate_reply(
        &self,
        topic_token: &str,
        history: &[HistoryEntry],
        current_data: Option<&Value>,
    ) -> Result<Reply, ChatError> {
        let Some((last, prior)) = history.split_last() else {
            return Err(ChatError::Validation(
                "conversation history must not be empty".to_string(),
            ));
        };
        if last.role != TurnRole::User {
            return Err(ChatError::Validation(
                "the last history entry must be a user message".to_string(),
            ));
        }
        let user_text = last.content.trim();
        if user_text.is_empty() {
            return Err(ChatError::Validation("content must not be empty".to_string()));
        }

        let topic = Topic::from_token(topic_token);
        let messages = self
            .assembler
            .assemble(&instruction_for(topic), prior, current_data, user_text);
        Ok(self.reconciler.reconcile(&self.provider, messages, topic).await)
    }
}

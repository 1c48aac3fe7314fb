//! Prompt assembly: instruction, bounded history, optional data payload, and
//! the new user utterance combined into one ordered message sequence.

use joseph_types::chat::{ConversationTurn, HistoryEntry, TurnRole};
use joseph_types::config::HistoryConfig;
use joseph_types::llm::{Message, MessageRole};
use serde_json::Value;

/// Anything that can be replayed as a prior turn.
pub trait TranscriptEntry {
    fn role(&self) -> TurnRole;
    fn text(&self) -> &str;
}

impl TranscriptEntry for ConversationTurn {
    fn role(&self) -> TurnRole {
        self.role
    }

    fn text(&self) -> &str {
        &self.text
    }
}

impl TranscriptEntry for HistoryEntry {
    fn role(&self) -> TurnRole {
        self.role
    }

    fn text(&self) -> &str {
        &self.content
    }
}

/// Builds the exact message sequence sent to the generation client.
///
/// Output layout:
/// 1. one `System` message: the instruction, plus a `Current data:` section
///    when a non-empty payload is supplied
/// 2. the replayed prior turns, oldest first
/// 3. the new user text
#[derive(Debug, Clone, Copy)]
pub struct PromptAssembler {
    history: HistoryConfig,
}

impl PromptAssembler {
    pub fn new(history: HistoryConfig) -> Self {
        Self { history }
    }

    pub fn history_config(&self) -> HistoryConfig {
        self.history
    }

    pub fn assemble<T: TranscriptEntry>(
        &self,
        instruction: &str,
        prior: &[T],
        current_data: Option<&Value>,
        user_text: &str,
    ) -> Vec<Message> {
        let window = self.window(prior);
        let mut messages = Vec::with_capacity(window.len() + 2);

        messages.push(Message::new(
            MessageRole::System,
            framing_text(instruction, current_data),
        ));
        messages.extend(
            window
                .iter()
                .map(|turn| Message::new(turn.role().into(), turn.text())),
        );
        messages.push(Message::new(MessageRole::User, user_text));

        messages
    }

    /// The most recent prior turns that fit both history limits.
    ///
    /// Turns are never split. When older turns were cut off, a window that
    /// would start with an assistant turn is advanced to the next user turn;
    /// an untruncated history is replayed whole.
    pub fn window<'a, T: TranscriptEntry>(&self, prior: &'a [T]) -> &'a [T] {
        if self.history.max_turns == 0 {
            return &prior[prior.len()..];
        }

        let mut start = prior.len();
        let mut chars = 0usize;
        for (idx, turn) in prior.iter().enumerate().rev() {
            let len = turn.text().chars().count();
            if prior.len() - idx > self.history.max_turns || chars + len > self.history.max_chars {
                break;
            }
            chars += len;
            start = idx;
        }

        if start > 0 {
            while start < prior.len() && prior[start].role() == TurnRole::Assistant {
                start += 1;
            }
        }

        &prior[start..]
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

fn framing_text(instruction: &str, current_data: Option<&Value>) -> String {
    match current_data.filter(|v| has_content(v)) {
        Some(data) => format!("{instruction}\n\nCurrent data:\n{data}"),
        None => instruction.to_string(),
    }
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

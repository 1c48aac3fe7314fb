//! Response reconciliation.
//!
//! Makes exactly one generation attempt per call and always produces reply
//! text: either the trimmed model output or the topic's fallback string.

use std::time::Duration;

use joseph_types::chat::ReplyOutcome;
use joseph_types::config::GenerationConfig;
use joseph_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message};
use joseph_types::topic::Topic;
use tracing::{Instrument, debug, info_span, warn};

use crate::chat::topic::fallback_reply;
use crate::llm::box_provider::BoxLlmProvider;

/// Reply text plus how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub outcome: ReplyOutcome,
}

/// Wraps one provider call in a timeout and converts every failure into the
/// topic fallback. No retries, no partial output.
#[derive(Debug, Clone)]
pub struct ResponseReconciler {
    model: String,
    temperature: Option<f64>,
    max_tokens: u32,
    timeout: Duration,
}

impl ResponseReconciler {
    pub fn new(model: String, temperature: Option<f64>, max_tokens: u32, timeout: Duration) -> Self {
        Self {
            model,
            temperature,
            max_tokens,
            timeout,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(
            config.model.clone(),
            Some(config.temperature),
            config.max_output_tokens,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn reconcile(
        &self,
        provider: &BoxLlmProvider,
        messages: Vec<Message>,
        topic: Topic,
    ) -> Reply {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let model = if request.model.is_empty() {
            provider.model()
        } else {
            request.model.as_str()
        };
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = provider.name(),
            gen_ai.request.model = %model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            joseph.topic = %topic,
            joseph.message_count = request.messages.len(),
        );

        let result = match tokio::time::timeout(
            self.timeout,
            provider.complete(&request).instrument(span),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.timeout.as_secs())),
        };

        let reply = reconcile_outcome(result, topic);
        match &reply.outcome {
            ReplyOutcome::Generated => {
                debug!(topic = %topic, chars = reply.text.len(), "generation succeeded");
            }
            ReplyOutcome::Fallback { reason } => {
                warn!(
                    topic = %topic,
                    provider = provider.name(),
                    reason = %reason,
                    "generation failed, using fallback reply"
                );
            }
        }
        reply
    }
}

/// Map one generation result onto the reply that gets persisted.
pub fn reconcile_outcome(result: Result<CompletionResponse, LlmError>, topic: Topic) -> Reply {
    let failure = match result {
        Ok(response) => {
            let text = response.content.trim();
            if !text.is_empty() {
                return Reply {
                    text: text.to_string(),
                    outcome: ReplyOutcome::Generated,
                };
            }
            LlmError::EmptyResponse
        }
        Err(e) => e,
    };

    Reply {
        text: fallback_reply(topic),
        outcome: ReplyOutcome::Fallback {
            reason: failure.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::{Scripted, ScriptedProvider};
    use joseph_types::llm::{MessageRole, Usage};

    fn response(content: &str) -> CompletionResponse {
        CompletionResponse {
            content: content.to_string(),
            model: "m".to_string(),
            finish_reason: None,
            usage: Usage::default(),
        }
    }

    fn reconciler(timeout_secs: u64) -> ResponseReconciler {
        ResponseReconciler::new(String::new(), Some(0.7), 256, Duration::from_secs(timeout_secs))
    }

    fn prompt() -> Vec<Message> {
        vec![
            Message::new(MessageRole::System, "frame"),
            Message::new(MessageRole::User, "hi"),
        ]
    }

    #[test]
    fn test_success_is_trimmed() {
        let reply = reconcile_outcome(Ok(response("  Competitor X leads...  ")), Topic::MarketAnalysis);
        assert_eq!(reply.text, "Competitor X leads...");
        assert_eq!(reply.outcome, ReplyOutcome::Generated);
    }

    #[test]
    fn test_blank_output_falls_back() {
        let reply = reconcile_outcome(Ok(response(" \n ")), Topic::TaxCompliance);
        assert_eq!(reply.text, fallback_reply(Topic::TaxCompliance));
        assert!(matches!(reply.outcome, ReplyOutcome::Fallback { .. }));
    }

    #[test]
    fn test_each_error_kind_falls_back() {
        for err in [
            LlmError::Network("reset".to_string()),
            LlmError::Malformed("no candidates".to_string()),
            LlmError::Timeout(30),
            LlmError::NotConfigured,
        ] {
            let reply = reconcile_outcome(Err(err), Topic::PricingStrategy);
            assert_eq!(reply.text, fallback_reply(Topic::PricingStrategy));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_triggers_fallback() {
        let provider = BoxLlmProvider::new(ScriptedProvider::new(vec![Scripted::Hang(
            Duration::from_secs(60),
        )]));
        let reply = reconciler(30).reconcile(&provider, prompt(), Topic::RevenueStrategy).await;

        assert_eq!(reply.text, fallback_reply(Topic::RevenueStrategy));
        assert_eq!(
            reply.outcome,
            ReplyOutcome::Fallback {
                reason: "generation timed out after 30s".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_request_carries_settings() {
        let scripted = std::sync::Arc::new(ScriptedProvider::replying("ok"));
        let provider = BoxLlmProvider::new(scripted.clone());
        let reply = reconciler(5).reconcile(&provider, prompt(), Topic::General).await;
        assert_eq!(reply.text, "ok");

        let requests = scripted.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 256);
        assert_eq!(requests[0].temperature, Some(0.7));
        assert_eq!(requests[0].messages, prompt());
    }
}

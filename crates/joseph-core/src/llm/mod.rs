//! Generation provider abstractions for Joseph.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted provider double for unit tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use joseph_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

    use super::provider::LlmProvider;

    /// One scripted provider behaviour.
    pub enum Scripted {
        Reply(String),
        Fail(LlmError),
        /// Sleep before replying; used with paused tokio time to force timeouts.
        Hang(Duration),
    }

    /// Plays back scripted outcomes in order and records every request.
    pub struct ScriptedProvider {
        script: Mutex<VecDeque<Scripted>>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub fn new(script: Vec<Scripted>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(text: &str) -> Self {
            Self::new(vec![Scripted::Reply(text.to_string())])
        }

        pub fn failing(err: LlmError) -> Self {
            Self::new(vec![Scripted::Fail(err)])
        }
    }

    /// Lets a test keep a handle on a provider after boxing it.
    impl<T: LlmProvider> LlmProvider for std::sync::Arc<T> {
        fn name(&self) -> &str {
            self.as_ref().name()
        }

        fn model(&self) -> &str {
            self.as_ref().model()
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.as_ref().complete(request).await
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            let next = self.script.lock().unwrap().pop_front();
            let text = match next {
                Some(Scripted::Reply(text)) => text,
                Some(Scripted::Fail(err)) => return Err(err),
                Some(Scripted::Hang(delay)) => {
                    tokio::time::sleep(delay).await;
                    "too late".to_string()
                }
                None => return Err(LlmError::Network("script exhausted".to_string())),
            };
            Ok(CompletionResponse {
                content: text,
                model: "scripted-model".to_string(),
                finish_reason: Some("stop".to_string()),
                usage: Usage::default(),
            })
        }
    }
}

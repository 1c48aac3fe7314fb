//! Generation provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `joseph-core`, and a provider factory ([`create_provider`]) that builds the
//! right one from the `[generation]` config section.
//!
//! [`LlmProvider`]: joseph_core::llm::provider::LlmProvider

pub mod gemini;
pub mod openai_compat;

use secrecy::SecretString;
use tracing::{info, warn};

use joseph_core::llm::box_provider::BoxLlmProvider;
use joseph_core::llm::provider::LlmProvider;
use joseph_types::config::GenerationConfig;
use joseph_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderType};

use self::gemini::GeminiProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Provider used when no API key is available.
///
/// Every call fails with [`LlmError::NotConfigured`], so chat keeps working
/// on fallback replies.
pub struct UnconfiguredProvider {
    provider: ProviderType,
}

impl UnconfiguredProvider {
    pub fn new(provider: ProviderType) -> Self {
        Self { provider }
    }
}

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        match self.provider {
            ProviderType::Gemini => "gemini",
            ProviderType::OpenAiCompatible => "openai",
        }
    }

    fn model(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::NotConfigured)
    }
}

/// Create a [`BoxLlmProvider`] from the `[generation]` config section.
///
/// Without an API key the result is an [`UnconfiguredProvider`]; startup
/// never fails for lack of credentials.
pub fn create_provider(config: &GenerationConfig, api_key: Option<SecretString>) -> BoxLlmProvider {
    let Some(key) = api_key else {
        warn!(
            provider = %config.provider,
            env = %config.api_key_env,
            "No API key found; replies will use topic fallbacks"
        );
        return BoxLlmProvider::new(UnconfiguredProvider::new(config.provider));
    };

    let provider = match config.provider {
        ProviderType::Gemini => {
            let mut provider = GeminiProvider::new(key, config.model.clone());
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url.to_string());
            }
            BoxLlmProvider::new(provider)
        }
        ProviderType::OpenAiCompatible => {
            let provider = match config.base_url.as_deref() {
                Some(base_url) => {
                    OpenAiCompatibleProvider::new("openai_compatible", &key, base_url, &config.model)
                }
                None => OpenAiCompatibleProvider::openai(&key, &config.model),
            };
            BoxLlmProvider::new(provider)
        }
    };

    info!(provider = provider.name(), model = provider.model(), "Generation provider ready");
    provider
}

/// Read the API key from the environment variable named in the config.
///
/// Blank values count as absent.
pub fn api_key_from_env(config: &GenerationConfig) -> Option<SecretString> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

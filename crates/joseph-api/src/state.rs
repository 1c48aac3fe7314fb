//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! `ChatService` is generic over its repository; AppState pins it to the
//! SQLite implementation.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use joseph_core::agent::{AgentControl, LocalAgentControl};
use joseph_core::chat::service::ChatService;
use joseph_infra::config::{load_global_config, resolve_data_dir};
use joseph_infra::llm::{api_key_from_env, create_provider};
use joseph_infra::sqlite::conversation::SqliteConversationRepository;
use joseph_infra::sqlite::pool::{DatabasePool, database_url};
use joseph_types::config::GlobalConfig;

pub type ConcreteChatService = ChatService<SqliteConversationRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub agent: Arc<dyn AgentControl>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: resolve the data dir, read
    /// `config.toml`, connect to the DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let api_key = api_key_from_env(&config.generation);

        Self::open(data_dir, config, api_key).await
    }

    /// Wire services against an explicit data dir, config, and API key.
    pub async fn open(
        data_dir: PathBuf,
        config: GlobalConfig,
        api_key: Option<SecretString>,
    ) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let provider = create_provider(&config.generation, api_key);
        let chat_service = ChatService::from_config(
            SqliteConversationRepository::new(db_pool.clone()),
            provider,
            &config.generation,
            config.history,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            agent: Arc::new(LocalAgentControl::new()),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}

//! Global configuration loader for Joseph.
//!
//! Reads `config.toml` from the data directory (`~/.joseph/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use joseph_types::config::GlobalConfig;

/// Resolve the data directory.
///
/// Priority: `JOSEPH_DATA_DIR`, then `~/.joseph`, then `./.joseph`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("JOSEPH_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".joseph");
    }

    // Last resort: current directory
    PathBuf::from(".joseph")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joseph_types::llm::ProviderType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.generation.provider, ProviderType::Gemini);
        assert_eq!(config.history.max_turns, 20);
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
[server]
host = "0.0.0.0"

[generation]
provider = "openai_compatible"
api_key_env = "OPENAI_API_KEY"
temperature = 0.3

[history]
max_turns = 8
max_chars = 4000
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.generation.provider, ProviderType::OpenAiCompatible);
        assert_eq!(config.generation.api_key_env, "OPENAI_API_KEY");
        assert!((config.generation.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.history.max_turns, 8);
        assert_eq!(config.history.max_chars, 4000);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.generation.timeout_secs, 30);
    }

    #[test]
    fn resolve_data_dir_is_never_empty() {
        assert!(!resolve_data_dir().as_os_str().is_empty());
    }
}

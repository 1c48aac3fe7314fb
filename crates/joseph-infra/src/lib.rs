//! Infrastructure layer for Joseph.
//!
//! Contains implementations of the ports defined in `joseph-core`: the SQLite
//! conversation store, the Gemini and OpenAI-compatible generation clients,
//! and the `config.toml` loader.

pub mod config;
pub mod llm;
pub mod sqlite;

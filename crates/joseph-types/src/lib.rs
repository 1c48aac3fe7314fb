//! Shared domain types for Joseph.
//!
//! This crate contains the core domain types used across the Joseph backend:
//! topics, conversations and turns, generation requests, configuration, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod topic;

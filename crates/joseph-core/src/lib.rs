//! Business logic and repository trait definitions for Joseph.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements, plus the conversational core: topic
//! resolution, prompt assembly, and reply reconciliation. It depends only on
//! `joseph-types` -- never on `joseph-infra` or any database/IO crate.

pub mod agent;
pub mod chat;
pub mod llm;

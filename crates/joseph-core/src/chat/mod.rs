//! Conversational core for Joseph.
//!
//! This module defines the `ConversationRepository` port that the
//! infrastructure layer implements, plus the pipeline that turns an inbound
//! chat request into two persisted turns:
//!
//! topic -> instruction ([`topic`]) -> message sequence ([`prompt`]) ->
//! generation with fallback ([`reconciler`]), orchestrated by [`service`].

#[cfg(test)]
pub(crate) mod in_memory;
pub mod prompt;
pub mod reconciler;
pub mod repository;
pub mod service;
pub mod topic;

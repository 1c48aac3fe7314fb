//! Google Gemini generation provider.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`LlmProvider`](joseph_core::llm::provider::LlmProvider) trait for the
//! Generative Language `generateContent` API.

pub mod client;
pub mod types;

pub use client::GeminiProvider;

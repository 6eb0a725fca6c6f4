//! # Portfolio Assistant Chat
//!
//! The language-model boundary and the conversational layer on top of it:
//! an OpenAI-style chat-completions client, the per-visitor session store,
//! and the responder that grounds each answer with retrieved portfolio
//! documents and degrades gracefully when an external service fails.

/// Chat-completions HTTP client and the `CompletionApi` trait
pub mod client;
/// Mock completion API for tests
pub mod mock;
/// Grounded response generation
pub mod responder;
/// Per-visitor session store
pub mod session;

pub use client::{CompletionApi, OpenAiClient, PromptMessage};
pub use responder::{Responder, FALLBACK_REPLY};
pub use session::SessionStore;

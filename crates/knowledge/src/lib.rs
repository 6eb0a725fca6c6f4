//! # Portfolio Assistant Knowledge
//!
//! The similarity-index boundary: a client for a Chroma-style vector store
//! holding the portfolio documents that ground the assistant's answers.
//! Embedding and indexing happen entirely inside the external store; this
//! crate only queries it.

/// Vector-store HTTP client and the `KnowledgeIndex` trait
pub mod client;
/// Mock index for tests
pub mod mock;

pub use client::{ChromaClient, KnowledgeIndex};

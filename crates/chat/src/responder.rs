//! Grounded response generation.
//!
//! Each turn retrieves the top-K most similar portfolio documents, folds
//! them into the prompt as extra system context, and completes against the
//! rolling session history. Failures degrade rather than propagate: a dead
//! vector store just means an ungrounded answer, and a dead language model
//! yields a fixed apologetic reply.

use std::sync::Arc;

use tracing::warn;

use portfolio_core::models::chat::{ChatRole, ChatSession};
use portfolio_knowledge::KnowledgeIndex;

use crate::client::{CompletionApi, PromptMessage};

/// Reply used whenever the language model cannot be reached.
pub const FALLBACK_REPLY: &str =
    "I apologize, but I'm having trouble generating a response at the moment. Please try again.";

/// How many retrieved documents ground each answer.
const GROUNDING_TOP_K: usize = 3;

/// Turns visitor messages into grounded replies.
pub struct Responder {
    completions: Arc<dyn CompletionApi>,
    knowledge: Arc<dyn KnowledgeIndex>,
    system_prompt: String,
}

impl Responder {
    pub fn new(
        completions: Arc<dyn CompletionApi>,
        knowledge: Arc<dyn KnowledgeIndex>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            completions,
            knowledge,
            system_prompt: system_prompt.into(),
        }
    }

    /// Standard persona prompt for a portfolio owner.
    pub fn default_system_prompt(owner_name: &str) -> String {
        format!(
            "You are {owner_name}'s AI assistant for their portfolio website. \
             Be professional, friendly, and informative when discussing their \
             experience, skills, and projects. When visitors want to schedule \
             a meeting, direct them to the booking form, which offers free \
             30-minute slots during business hours."
        )
    }

    /// Produce a reply to `user_text` and record the turn in the session.
    ///
    /// Never returns an error to the caller: external failures degrade to
    /// an ungrounded answer or to [`FALLBACK_REPLY`].
    pub async fn respond(&self, session: &mut ChatSession, user_text: &str) -> String {
        let grounding = match self
            .knowledge
            .similarity_search(user_text, GROUNDING_TOP_K)
            .await
        {
            Ok(documents) => documents,
            Err(err) => {
                warn!(error = %err, "Similarity search failed; answering ungrounded");
                Vec::new()
            }
        };

        let mut messages = Vec::with_capacity(session.messages.len() + 3);
        messages.push(PromptMessage::system(&self.system_prompt));

        if !grounding.is_empty() {
            let context = grounding
                .iter()
                .map(|doc| doc.content.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            messages.push(PromptMessage::system(format!("Context: {context}")));
        }

        for message in &session.messages {
            messages.push(PromptMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            });
        }
        messages.push(PromptMessage::user(user_text));

        let reply = match self.completions.complete(&messages).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Completion failed; returning fallback reply");
                FALLBACK_REPLY.to_string()
            }
        };

        session.push(ChatRole::User, user_text);
        session.push(ChatRole::Assistant, reply.clone());
        reply
    }
}

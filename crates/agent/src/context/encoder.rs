//! Conversation encoding: from turns to a bounded token window.
//!
//! The strategy that turns a [`Conversation`] into ids is injected into
//! [`ConversationTokenizer`] at construction time, so different models can
//! use different conversation layouts against the same tokenizer.

use std::sync::Arc;

use talker_core::error::Result;
use talker_core::message::Conversation;
use talker_core::token::{ContextWindow, TokenId, Tokenizer};
use tracing::debug;

use crate::context::truncate::truncate;

/// Delimiter text placed between utterances; encodes to the boundary marker.
pub const DEFAULT_SEPARATOR: &str = "    ";

/// Strategy for turning a conversation into a context window.
pub trait ConversationEncoder: Send + Sync {
    fn encode(
        &self,
        tokenizer: &dyn Tokenizer,
        conversation: &Conversation,
    ) -> Result<ContextWindow>;
}

/// Joins all turn texts with a separator, encodes once, and applies
/// boundary-aware truncation with the tokenizer's budget.
#[derive(Debug, Clone)]
pub struct SeparatorEncoder {
    separator: String,
}

impl SeparatorEncoder {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn join(&self, conversation: &Conversation) -> String {
        conversation
            .iter_texts()
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

impl Default for SeparatorEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl ConversationEncoder for SeparatorEncoder {
    fn encode(
        &self,
        tokenizer: &dyn Tokenizer,
        conversation: &Conversation,
    ) -> Result<ContextWindow> {
        let ids = tokenizer.encode(&self.join(conversation))?;
        let window = truncate(
            &ids,
            tokenizer.max_context_length(),
            tokenizer.boundary_marker(),
        )?;

        debug!(
            conversation_id = %conversation.id,
            turns = conversation.len(),
            encoded = ids.len(),
            kept = window.len(),
            "Encoded conversation"
        );

        Ok(window)
    }
}

/// A tokenizer paired with the conversation layout it should use.
pub struct ConversationTokenizer {
    tokenizer: Arc<dyn Tokenizer>,
    encoder: Box<dyn ConversationEncoder>,
}

impl ConversationTokenizer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, encoder: Box<dyn ConversationEncoder>) -> Self {
        Self { tokenizer, encoder }
    }

    /// Pair a tokenizer with the default separator layout.
    pub fn with_default_encoder(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self::new(tokenizer, Box::new(SeparatorEncoder::default()))
    }

    /// Swap the layout strategy for the same tokenizer.
    pub fn with_encoder(self, encoder: Box<dyn ConversationEncoder>) -> Self {
        Self {
            tokenizer: self.tokenizer,
            encoder,
        }
    }

    pub fn encode_conversation(&self, conversation: &Conversation) -> Result<ContextWindow> {
        self.encoder.encode(self.tokenizer.as_ref(), conversation)
    }

    pub fn decode(&self, ids: &[TokenId]) -> Result<String> {
        Ok(self.tokenizer.decode(ids)?)
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }
}

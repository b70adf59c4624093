//! The responder: utterances in, normalized model response out.

use std::sync::Arc;
use std::time::Instant;

use talker_core::error::Result;
use talker_core::generator::{GenerationParams, Generator};
use talker_core::message::{Conversation, Utterance};
use talker_core::token::Tokenizer;
use tracing::{debug, info};

use crate::context::encoder::{ConversationEncoder, ConversationTokenizer};
use crate::context::normalize::normalize;
use crate::context::turns::assemble;

/// Generates a reply for a conversation using the injected collaborators.
pub struct Talker {
    /// Tokenizer plus the conversation layout
    tokenizer: ConversationTokenizer,

    /// The generative model
    generator: Arc<dyn Generator>,

    /// Forwarded to the generator on every call
    params: GenerationParams,
}

impl Talker {
    /// Create a talker with the default separator layout and parameters.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, generator: Arc<dyn Generator>) -> Self {
        Self {
            tokenizer: ConversationTokenizer::with_default_encoder(tokenizer),
            generator,
            params: GenerationParams::default(),
        }
    }

    /// Replace the conversation layout strategy, keeping the tokenizer.
    pub fn with_encoder(mut self, encoder: Box<dyn ConversationEncoder>) -> Self {
        self.tokenizer = self.tokenizer.with_encoder(encoder);
        self
    }

    /// Set the generation parameters.
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Assemble the utterances and respond to the resulting conversation.
    pub async fn respond(&self, utterances: &[Utterance]) -> Result<String> {
        let conversation = assemble(utterances)?;
        self.respond_to(&conversation).await
    }

    /// Respond to an already assembled conversation.
    pub async fn respond_to(&self, conversation: &Conversation) -> Result<String> {
        let started = Instant::now();
        let window = self.tokenizer.encode_conversation(conversation)?;

        debug!(
            conversation_id = %conversation.id,
            context_tokens = window.len(),
            dropped_tokens = window.dropped(),
            "Context window ready"
        );

        let output = self.generator.generate(&window, &self.params).await?;
        let text = self.tokenizer.decode(&output)?;
        let response = normalize(&text);

        info!(
            conversation_id = %conversation.id,
            generator = self.generator.name(),
            turns = conversation.len(),
            context_tokens = window.len(),
            generated_tokens = output.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generated response"
        );

        Ok(response)
    }
}

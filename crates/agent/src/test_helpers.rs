//! Shared test helpers: an in-memory tokenizer and a scripted generator.

use std::sync::Mutex;

use async_trait::async_trait;
use talker_core::error::ProviderError;
use talker_core::generator::{GenerationParams, Generator};
use talker_core::token::{ContextWindow, TokenId, Tokenizer};

use crate::context::encoder::DEFAULT_SEPARATOR;

/// Id of the separator in [`VocabTokenizer`].
pub const MARKER: TokenId = 0;

/// A word-level tokenizer that grows its vocabulary on demand.
///
/// The separator encodes to [`MARKER`]; every distinct word gets the next
/// free id starting at 1. Decoding joins words with single spaces and
/// renders the marker as the separator itself.
pub struct VocabTokenizer {
    words: Mutex<Vec<String>>,
    max_length: usize,
}

impl VocabTokenizer {
    pub fn new(max_length: usize) -> Self {
        Self {
            words: Mutex::new(Vec::new()),
            max_length,
        }
    }

    fn id_for(&self, word: &str) -> TokenId {
        let mut words = self.words.lock().unwrap();
        let index = match words.iter().position(|w| w == word) {
            Some(index) => index,
            None => {
                words.push(word.to_string());
                words.len() - 1
            }
        };
        index as TokenId + 1
    }
}

impl Tokenizer for VocabTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, ProviderError> {
        let mut ids = Vec::new();
        for (i, utterance) in text.split(DEFAULT_SEPARATOR).enumerate() {
            if i > 0 {
                ids.push(MARKER);
            }
            for word in utterance.split_whitespace() {
                ids.push(self.id_for(word));
            }
        }
        Ok(ids)
    }

    fn decode(&self, ids: &[TokenId]) -> Result<String, ProviderError> {
        let words = self.words.lock().unwrap();
        let mut pieces = Vec::with_capacity(ids.len());
        for &id in ids {
            if id == MARKER {
                pieces.push(DEFAULT_SEPARATOR.to_string());
                continue;
            }
            let word = words
                .get(id as usize - 1)
                .ok_or_else(|| ProviderError::Tokenization(format!("unknown id {id}")))?;
            pieces.push(word.clone());
        }
        Ok(pieces.join(" "))
    }

    fn boundary_marker(&self) -> TokenId {
        MARKER
    }

    fn max_context_length(&self) -> usize {
        self.max_length
    }
}

/// A generator that always returns the same ids and records what it saw.
pub struct ScriptedGenerator {
    reply: Vec<TokenId>,
    calls: Mutex<usize>,
    last_window: Mutex<Option<ContextWindow>>,
    last_params: Mutex<Option<GenerationParams>>,
}

impl ScriptedGenerator {
    pub fn new(reply: Vec<TokenId>) -> Self {
        Self {
            reply,
            calls: Mutex::new(0),
            last_window: Mutex::new(None),
            last_params: Mutex::new(None),
        }
    }

    /// Reply with `text`, encoded by `tokenizer`.
    pub fn replying(tokenizer: &VocabTokenizer, text: &str) -> Self {
        Self::new(tokenizer.encode(text).unwrap())
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn last_window(&self) -> Option<ContextWindow> {
        self.last_window.lock().unwrap().clone()
    }

    pub fn last_params(&self) -> Option<GenerationParams> {
        self.last_params.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        window: &ContextWindow,
        params: &GenerationParams,
    ) -> Result<Vec<TokenId>, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        *self.last_window.lock().unwrap() = Some(window.clone());
        *self.last_params.lock().unwrap() = Some(params.clone());
        Ok(self.reply.clone())
    }
}

//! Generator trait: the abstraction over the sequence-generation model.
//!
//! A generator receives a bounded [`ContextWindow`] and returns the ids of
//! the generated response. How it searches (greedy, sampling, beams) is its
//! own business; the parameters below are passed through untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::token::{ContextWindow, TokenId};

/// Options forwarded to the model's search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Beam count
    #[serde(default = "default_num_beams")]
    pub num_beams: usize,

    /// Minimum number of generated tokens before end-of-sequence is allowed
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Size of n-grams that may not repeat in the output (0 = disabled)
    #[serde(default = "default_no_repeat_ngram_size")]
    pub no_repeat_ngram_size: usize,

    /// Hard cap on generated tokens
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: usize,

    /// Sampling temperature (0.0 = greedy)
    #[serde(default)]
    pub temperature: f64,

    /// Sampling seed
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_num_beams() -> usize {
    10
}
fn default_min_length() -> usize {
    20
}
fn default_no_repeat_ngram_size() -> usize {
    3
}
fn default_max_new_tokens() -> usize {
    64
}
fn default_seed() -> u64 {
    42
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            num_beams: default_num_beams(),
            min_length: default_min_length(),
            no_repeat_ngram_size: default_no_repeat_ngram_size(),
            max_new_tokens: default_max_new_tokens(),
            temperature: 0.0,
            seed: default_seed(),
        }
    }
}

/// The generative model collaborator.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Generate a response for the given context.
    async fn generate(
        &self,
        window: &ContextWindow,
        params: &GenerationParams,
    ) -> Result<Vec<TokenId>, ProviderError>;
}

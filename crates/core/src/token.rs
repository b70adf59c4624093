//! Token ids, the bounded context window, and the tokenizer contract.
//!
//! Token ids are opaque except for one reserved id, the boundary marker,
//! which the tokenizer produces for the delimiter text placed between
//! concatenated utterances.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};

/// An id drawn from the tokenizer's fixed vocabulary.
pub type TokenId = u32;

/// A token sequence bounded by the model's maximum context length.
///
/// Produced by the boundary-aware truncator; only the truncator decides
/// where the window starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    ids: Vec<TokenId>,
    /// Number of leading tokens cut from the full sequence.
    dropped: usize,
}

impl ContextWindow {
    pub fn new(ids: Vec<TokenId>, dropped: usize) -> Self {
        Self { ids, dropped }
    }

    pub fn ids(&self) -> &[TokenId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }
}

/// The tokenizer collaborator.
///
/// Implementations own the vocabulary. The context pipeline only needs
/// the encode/decode pair, the boundary marker id, and the context budget.
pub trait Tokenizer: Send + Sync {
    /// Encode text to ids without adding special tokens.
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, ProviderError>;

    /// Decode ids to text, skipping special tokens.
    fn decode(&self, ids: &[TokenId]) -> Result<String, ProviderError>;

    /// The id the utterance delimiter encodes to.
    fn boundary_marker(&self) -> TokenId;

    /// The model's maximum context length in tokens.
    fn max_context_length(&self) -> usize;
}

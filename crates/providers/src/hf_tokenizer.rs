//! Tokenizer backed by Hugging Face `tokenizers`.

use std::path::Path;

use hf_hub::api::sync::Api;
use talker_core::error::ProviderError;
use talker_core::token::{TokenId, Tokenizer};
use tracing::{debug, info};

/// A `tokenizer.json` tokenizer with a resolved boundary marker.
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
    boundary_marker: TokenId,
    max_context_length: usize,
}

impl HfTokenizer {
    /// Wrap a loaded tokenizer.
    ///
    /// When `boundary_marker` is `None` the marker is the single id that
    /// `separator` encodes to; a separator spanning several tokens is a
    /// configuration error.
    pub fn new(
        inner: tokenizers::Tokenizer,
        separator: &str,
        boundary_marker: Option<TokenId>,
        max_context_length: usize,
    ) -> Result<Self, ProviderError> {
        let boundary_marker = match boundary_marker {
            Some(id) => id,
            None => resolve_marker(&inner, separator)?,
        };

        debug!(boundary_marker, max_context_length, "Tokenizer ready");

        Ok(Self {
            inner,
            boundary_marker,
            max_context_length,
        })
    }

    /// Load from a local `tokenizer.json`.
    pub fn from_file(
        path: &Path,
        separator: &str,
        boundary_marker: Option<TokenId>,
        max_context_length: usize,
    ) -> Result<Self, ProviderError> {
        info!(path = %path.display(), "Loading tokenizer");
        let inner = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| ProviderError::NotConfigured(format!("Failed to load tokenizer: {e}")))?;
        Self::new(inner, separator, boundary_marker, max_context_length)
    }

    /// Download (or reuse the cached) `tokenizer.json` from a Hub repo.
    pub fn from_hub(
        repo: &str,
        separator: &str,
        boundary_marker: Option<TokenId>,
        max_context_length: usize,
    ) -> Result<Self, ProviderError> {
        let api = Api::new().map_err(|e| {
            ProviderError::Network(format!("Failed to initialize HuggingFace Hub API: {e}"))
        })?;
        let path = api.model(repo.to_string()).get("tokenizer.json").map_err(|e| {
            ProviderError::Network(format!("Failed to download tokenizer from '{repo}': {e}"))
        })?;
        Self::from_file(&path, separator, boundary_marker, max_context_length)
    }
}

fn resolve_marker(
    tokenizer: &tokenizers::Tokenizer,
    separator: &str,
) -> Result<TokenId, ProviderError> {
    let encoding = tokenizer
        .encode(separator, false)
        .map_err(|e| ProviderError::Tokenization(e.to_string()))?;

    match encoding.get_ids() {
        [id] => Ok(*id),
        ids => Err(ProviderError::NotConfigured(format!(
            "Separator {separator:?} encodes to {} tokens; set context.boundary_marker explicitly",
            ids.len()
        ))),
    }
}

impl Tokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, ProviderError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| ProviderError::Tokenization(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[TokenId]) -> Result<String, ProviderError> {
        self.inner
            .decode(ids, true)
            .map_err(|e| ProviderError::Tokenization(format!("Detokenization failed: {e}")))
    }

    fn boundary_marker(&self) -> TokenId {
        self.boundary_marker
    }

    fn max_context_length(&self) -> usize {
        self.max_context_length
    }
}

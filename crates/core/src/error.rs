//! Error types for the talker domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use crate::message::Role;
use thiserror::Error;

/// The top-level error type for all talker operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Context pipeline errors ---
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    // --- Tokenizer / model errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Precondition violations detected by the pure context functions.
///
/// None of these are transient. A malformed alternation means the upstream
/// event source broke its contract and must not be retried or masked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("Malformed alternation at utterance {index}: expected {expected}, found {found}")]
    MalformedAlternation {
        index: usize,
        expected: Role,
        found: Role,
    },

    #[error("Invalid max context length {0}: must be at least 1")]
    InvalidMaxLength(usize),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

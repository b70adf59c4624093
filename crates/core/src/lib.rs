//! # Talker Core
//!
//! Domain types, collaborator traits, and error definitions for the talker
//! fallback responder. This crate has **no framework dependencies**: it
//! defines the model that the context pipeline and the concrete
//! tokenizer/model backends are written against.
//!
//! ## Layout
//!
//! - [`event`]: the append-only conversation event log read after a fallback
//! - [`message`]: utterances, turns, and assembled conversations
//! - [`token`]: token ids, the bounded [`ContextWindow`], and the [`Tokenizer`] trait
//! - [`generator`]: the [`Generator`] trait and its generation parameters
//! - [`error`]: the error taxonomy

pub mod error;
pub mod event;
pub mod generator;
pub mod message;
pub mod token;

// Re-export key types at crate root for ergonomics
pub use error::{ContextError, Error, ProviderError, Result};
pub use event::{DEFAULT_FALLBACK_ACTION, Event, EventKind, EventLog};
pub use generator::{GenerationParams, Generator};
pub use message::{Conversation, ConversationId, Role, Turn, Utterance};
pub use token::{ContextWindow, TokenId, Tokenizer};

//! Context preparation and fallback responses for a generative dialogue model.
//!
//! After the bot fails to understand the user, the fallback flow is:
//!
//! 1. **Extract** the thread of fallback-linked turns from the event log
//! 2. **Assemble** it into a conversation with a pending user query
//! 3. **Encode** the conversation and truncate it at an utterance boundary
//! 4. **Generate** a reply with the injected model
//! 5. **Normalize** the reply's whitespace and hand it back to the platform

pub mod context;
pub mod fallback;
pub mod talker;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use context::{
    BoundaryTruncator, ConversationEncoder, ConversationTokenizer, DEFAULT_SEPARATOR,
    HistoryExtractor, SeparatorEncoder, assemble, assemble_texts, extract, normalize, truncate,
};
pub use fallback::{FallbackAction, FallbackOutcome};
pub use talker::Talker;

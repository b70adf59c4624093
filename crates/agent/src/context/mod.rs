//! Context preparation for the generative model.
//!
//! # Pipeline
//!
//! | Stage | Module | Input → Output |
//! |-------|--------|----------------|
//! | 1. History extraction | [`history`] | event log → utterances |
//! | 2. Turn assembly | [`turns`] | utterances → conversation |
//! | 3. Encoding + truncation | [`encoder`], [`truncate`] | conversation → context window |
//! | 4. Normalization | [`normalize`] | generated text → final text |
//!
//! Every stage is a pure, synchronous function over borrowed input.

pub mod encoder;
pub mod history;
pub mod normalize;
pub mod truncate;
pub mod turns;

pub use encoder::{ConversationEncoder, ConversationTokenizer, DEFAULT_SEPARATOR, SeparatorEncoder};
pub use history::{HistoryExtractor, extract};
pub use normalize::normalize;
pub use truncate::{BoundaryTruncator, truncate};
pub use turns::{assemble, assemble_texts};

//! Utterance, Turn and Conversation domain types.
//!
//! These are the value objects that flow through the context pipeline:
//! event log → utterances → conversation → tokens → generated response.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an assembled conversation, used to correlate logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The speaker of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The bot
    Bot,
}

impl Role {
    /// The role expected to speak after this one.
    pub fn next(self) -> Self {
        match self {
            Self::User => Self::Bot,
            Self::Bot => Self::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Bot => f.write_str("bot"),
        }
    }
}

/// One thing someone said, tagged with who said it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub role: Role,
    pub text: String,
}

impl Utterance {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
        }
    }
}

/// One speaker's contribution within an assembled conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    /// `false` only for the trailing user query that still awaits a response.
    pub finalized: bool,
}

/// An ordered sequence of turns, built fresh for each response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub turns: Vec<Turn>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self {
            id: ConversationId::new(),
            turns: Vec::new(),
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The open user query, if the conversation ends with one.
    pub fn pending_query(&self) -> Option<&Turn> {
        self.turns
            .last()
            .filter(|turn| turn.role == Role::User && !turn.finalized)
    }

    /// Append the generated response, closing the pending query.
    pub fn append_response(&mut self, text: impl Into<String>) {
        if let Some(last) = self.turns.last_mut() {
            last.finalized = true;
        }
        self.turns.push(Turn {
            role: Role::Bot,
            text: text.into(),
            finalized: true,
        });
    }

    /// Turn texts in order, the input to conversation encoding.
    pub fn iter_texts(&self) -> impl Iterator<Item = &str> {
        self.turns.iter().map(|turn| turn.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

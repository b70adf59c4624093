//! The conversation event log.
//!
//! The chat platform records everything that happens in a conversation as
//! an ordered list of events, most recent last. After a fallback the log is
//! read (never written) to recover the part of the conversation the bot
//! failed to handle.
//!
//! The wire format is the tracker's JSON event list: objects tagged by an
//! `"event"` field. Unknown tags deserialize as [`Event::Other`] and unknown
//! fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// Name of the platform's default fallback action.
pub const DEFAULT_FALLBACK_ACTION: &str = "action_default_fallback";

/// A single record in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The user said something.
    User {
        #[serde(default, deserialize_with = "nullable_text")]
        text: String,
    },

    /// The bot said something.
    Bot {
        #[serde(default, deserialize_with = "nullable_text")]
        text: String,
    },

    /// An action was executed.
    Action { name: String },

    /// Instructs the platform to forget the latest user utterance.
    UserUtteranceReverted,

    /// Slots, session markers, and anything else the core does not read.
    #[serde(other)]
    Other,
}

/// The coarse classification the history extractor works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    UserUtterance,
    BotUtterance,
    ActionExecuted,
    Other,
}

impl Event {
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::Bot { text: text.into() }
    }

    pub fn action(name: impl Into<String>) -> Self {
        Self::Action { name: name.into() }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::User { .. } => EventKind::UserUtterance,
            Self::Bot { .. } => EventKind::BotUtterance,
            Self::Action { .. } => EventKind::ActionExecuted,
            Self::UserUtteranceReverted | Self::Other => EventKind::Other,
        }
    }

    /// Utterance text, for user and bot events only.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::User { text } | Self::Bot { text } => Some(text),
            _ => None,
        }
    }

    /// Whether this event is the execution of the named action.
    pub fn is_action(&self, action_name: &str) -> bool {
        matches!(self, Self::Action { name } if name == action_name)
    }
}

/// Platforms send `"text": null` for bot messages that only carry buttons
/// or attachments.
fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// An append-only, ordered sequence of events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of tracker events.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append an event at the end (most recent position).
    pub fn append(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<Event>> for EventLog {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl FromIterator<Event> for EventLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

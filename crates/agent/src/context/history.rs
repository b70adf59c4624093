//! History extraction: what the model should see after a fallback.
//!
//! Walks the event log backward from the most recent event and keeps
//! extending the window over user turns that were themselves followed by
//! a fallback, so the model sees the whole thread of things the bot failed
//! to understand rather than only the latest message.
//!
//! # Algorithm
//!
//! | Event (scanning backward) | Effect |
//! |---------------------------|--------|
//! | fallback action | the next user turn found is linked |
//! | bot utterance | a pending link set by a fallback is cleared: that user turn was answered |
//! | user utterance, linked | window starts here; keep scanning |
//! | user utterance, not linked | stop; this turn and everything before it is out of scope |
//!
//! The scan starts linked because extraction runs inside a fallback, so
//! the latest user turn is always eligible. A single forward pass then
//! collects every user and bot utterance from the window start.

use talker_core::event::{DEFAULT_FALLBACK_ACTION, Event};
use talker_core::message::Utterance;
use tracing::debug;

/// Whether the next user turn found by the backward scan belongs to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    /// Inside the fallback that triggered extraction.
    Current,
    /// A fallback was seen since the last user turn.
    Fallback,
    /// The last user turn consumed the link.
    Unlinked,
}

/// Extracts the conversation slice linked by repeated fallbacks.
#[derive(Debug, Clone)]
pub struct HistoryExtractor {
    fallback_action: String,
}

impl HistoryExtractor {
    /// Create an extractor that treats `fallback_action` as the fallback marker.
    pub fn new(fallback_action: impl Into<String>) -> Self {
        Self {
            fallback_action: fallback_action.into(),
        }
    }

    pub fn fallback_action(&self) -> &str {
        &self.fallback_action
    }

    /// Index of the user event where the relevant window begins.
    ///
    /// `None` when the log holds no eligible user utterance.
    pub fn window_start(&self, events: &[Event]) -> Option<usize> {
        let mut link = Link::Current;
        let mut start = None;

        for (index, event) in events.iter().enumerate().rev() {
            match event {
                Event::Action { .. } if event.is_action(&self.fallback_action) => {
                    link = Link::Fallback;
                }
                Event::Bot { .. } if link == Link::Fallback => {
                    link = Link::Unlinked;
                }
                Event::User { .. } => {
                    if link == Link::Unlinked {
                        break;
                    }
                    start = Some(index);
                    link = Link::Unlinked;
                }
                _ => {}
            }
        }

        start
    }

    /// Ordered user and bot utterances from the window start to the end.
    pub fn extract(&self, events: &[Event]) -> Vec<Utterance> {
        self.extract_window(events)
            .map(|(_, utterances)| utterances)
            .unwrap_or_default()
    }

    /// The window start together with its utterances, from a single scan.
    ///
    /// `None` when the log holds no eligible user utterance.
    pub fn extract_window(&self, events: &[Event]) -> Option<(usize, Vec<Utterance>)> {
        let Some(start) = self.window_start(events) else {
            debug!(events = events.len(), "No eligible user turn in event log");
            return None;
        };

        let utterances: Vec<Utterance> = events[start..]
            .iter()
            .filter_map(|event| match event {
                Event::User { text } => Some(Utterance::user(text.as_str())),
                Event::Bot { text } => Some(Utterance::bot(text.as_str())),
                _ => None,
            })
            .collect();

        debug!(
            events = events.len(),
            start,
            utterances = utterances.len(),
            "Extracted fallback history window"
        );

        Some((start, utterances))
    }
}

impl Default for HistoryExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_ACTION)
    }
}

/// Extract the fallback history window using the default fallback action.
pub fn extract(events: &[Event]) -> Vec<Utterance> {
    HistoryExtractor::default().extract(events)
}

//! The fallback action: answer what the bot failed to understand.
//!
//! Runs when the platform's own policies give up. It extracts the thread
//! of fallback-linked turns from the event log, has the [`Talker`] generate
//! a reply, and asks the platform to revert the user utterance that
//! triggered the fallback so the conversation can continue normally.

use serde::{Deserialize, Serialize};
use talker_core::error::Result;
use talker_core::event::{Event, EventLog};
use tracing::{info, warn};

use crate::context::history::HistoryExtractor;
use crate::talker::Talker;

/// What the fallback action hands back to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackOutcome {
    /// The message to send, absent when there was no context to answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Events to append to the log.
    pub events: Vec<Event>,
}

/// Generative fallback handler.
pub struct FallbackAction {
    extractor: HistoryExtractor,
    talker: Talker,
}

impl FallbackAction {
    /// Create a handler registered under the default fallback action name.
    pub fn new(talker: Talker) -> Self {
        Self {
            extractor: HistoryExtractor::default(),
            talker,
        }
    }

    /// Use a custom history extractor (and with it, the action name).
    pub fn with_extractor(mut self, extractor: HistoryExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// The action name this handler answers to.
    pub fn name(&self) -> &str {
        self.extractor.fallback_action()
    }

    pub async fn run(&self, log: &EventLog) -> Result<FallbackOutcome> {
        let history = self.extractor.extract(log.events());
        let events = vec![Event::UserUtteranceReverted];

        if history.is_empty() {
            warn!(
                action = self.name(),
                events = log.len(),
                "No conversation context available, skipping generation"
            );
            return Ok(FallbackOutcome {
                message: None,
                events,
            });
        }

        let message = self.talker.respond(&history).await?;
        info!(
            action = self.name(),
            utterances = history.len(),
            "Fallback handled"
        );

        Ok(FallbackOutcome {
            message: Some(message),
            events,
        })
    }
}

//! Turn assembly: flat utterances into a structured conversation.
//!
//! The input must alternate strictly, starting with the user. Every turn
//! is finalized except a trailing user turn, which is the pending query
//! the model is asked to answer. Non-alternating input is rejected, not
//! repaired: silently re-assigning speakers would corrupt who said what.

use talker_core::error::ContextError;
use talker_core::message::{Conversation, Role, Turn, Utterance};

/// Build a conversation from role-tagged utterances.
pub fn assemble(utterances: &[Utterance]) -> Result<Conversation, ContextError> {
    let mut conversation = Conversation::new();
    let mut expected = Role::User;

    for (index, utterance) in utterances.iter().enumerate() {
        if utterance.role != expected {
            return Err(ContextError::MalformedAlternation {
                index,
                expected,
                found: utterance.role,
            });
        }

        let is_last = index + 1 == utterances.len();
        conversation.push(Turn {
            role: utterance.role,
            text: utterance.text.clone(),
            finalized: !(is_last && utterance.role == Role::User),
        });
        expected = expected.next();
    }

    Ok(conversation)
}

/// Build a conversation from untagged texts, assigning roles by position:
/// even indices are the user, odd indices the bot.
pub fn assemble_texts<S: AsRef<str>>(texts: &[S]) -> Conversation {
    let mut conversation = Conversation::new();

    for (index, text) in texts.iter().enumerate() {
        let role = if index % 2 == 0 { Role::User } else { Role::Bot };
        let is_last = index + 1 == texts.len();
        conversation.push(Turn {
            role,
            text: text.as_ref().to_string(),
            finalized: !(is_last && role == Role::User),
        });
    }

    conversation
}

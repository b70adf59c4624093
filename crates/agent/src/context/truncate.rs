//! Boundary-aware truncation of a tokenized conversation.
//!
//! The model accepts at most `max_length` tokens. When the encoded
//! conversation is longer, whole oldest utterances are dropped rather than
//! cutting into a newer one: the window starts right after the earliest
//! boundary marker inside the last `max_length` tokens. Only when no such
//! marker exists does the truncator fall back to a hard cut, which may
//! bisect an utterance.

use talker_core::error::ContextError;
use talker_core::token::{ContextWindow, TokenId};
use tracing::debug;

/// Scan state while walking the candidate window oldest → newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Seeking,
    FoundBoundary,
}

/// Offset of the first non-marker token that directly follows a marker.
fn aligned_offset(window: &[TokenId], boundary_marker: TokenId) -> Option<usize> {
    let mut state = ScanState::Seeking;

    for (offset, &token) in window.iter().enumerate() {
        if token == boundary_marker {
            state = ScanState::FoundBoundary;
        } else if state == ScanState::FoundBoundary {
            return Some(offset);
        }
    }

    None
}

/// Return the longest suffix of `tokens` that fits `max_length` and,
/// when possible, starts immediately after a boundary marker.
///
/// Only the last `max_length` tokens are ever inspected.
pub fn truncate(
    tokens: &[TokenId],
    max_length: usize,
    boundary_marker: TokenId,
) -> Result<ContextWindow, ContextError> {
    Ok(BoundaryTruncator::new(max_length, boundary_marker)?.apply(tokens))
}

/// A truncator bound to one tokenizer's budget and boundary marker.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryTruncator {
    max_length: usize,
    boundary_marker: TokenId,
}

impl BoundaryTruncator {
    pub fn new(max_length: usize, boundary_marker: TokenId) -> Result<Self, ContextError> {
        if max_length == 0 {
            return Err(ContextError::InvalidMaxLength(max_length));
        }
        Ok(Self {
            max_length,
            boundary_marker,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn boundary_marker(&self) -> TokenId {
        self.boundary_marker
    }

    pub fn apply(&self, tokens: &[TokenId]) -> ContextWindow {
        if tokens.len() <= self.max_length {
            return ContextWindow::new(tokens.to_vec(), 0);
        }

        let window_start = tokens.len() - self.max_length;
        let start = match aligned_offset(&tokens[window_start..], self.boundary_marker) {
            Some(offset) => {
                debug!(
                    total = tokens.len(),
                    max_length = self.max_length,
                    kept = self.max_length - offset,
                    "Truncated context at utterance boundary"
                );
                window_start + offset
            }
            None => {
                debug!(
                    total = tokens.len(),
                    max_length = self.max_length,
                    "No utterance boundary in window, hard cut"
                );
                window_start
            }
        };

        ContextWindow::new(tokens[start..].to_vec(), start)
    }
}

//! Response normalization.

/// Collapse every whitespace run into a single space and trim both ends.
///
/// Idempotent: normalizing twice gives the same result as once.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

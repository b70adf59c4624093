//! Logit constraints applied before each sampling step.
//!
//! These implement the `min_length` and `no_repeat_ngram_size` generation
//! options on top of a plain greedy/temperature sampler.

use talker_core::token::TokenId;

/// Tokens that would complete an n-gram already present in `tokens`.
///
/// `n == 0` disables the constraint.
pub fn banned_ngram_tokens(tokens: &[TokenId], n: usize) -> Vec<TokenId> {
    if n == 0 || tokens.len() + 1 < n {
        return Vec::new();
    }
    if n == 1 {
        return tokens.to_vec();
    }

    let prefix = &tokens[tokens.len() + 1 - n..];
    tokens
        .windows(n)
        .filter(|ngram| &ngram[..n - 1] == prefix)
        .map(|ngram| ngram[n - 1])
        .collect()
}

/// Push banned tokens (and EOS, while under `min_length`) to -inf.
pub fn constrain_logits(
    logits: &mut [f32],
    generated: &[TokenId],
    eos_token_id: TokenId,
    min_length: usize,
    no_repeat_ngram_size: usize,
) {
    let mut block = |id: TokenId| {
        if let Some(logit) = logits.get_mut(id as usize) {
            *logit = f32::NEG_INFINITY;
        }
    };

    if generated.len() < min_length {
        block(eos_token_id);
    }
    for id in banned_ngram_tokens(generated, no_repeat_ngram_size) {
        block(id);
    }
}

//! Runtime invariant assertions.
//!
//! These are debug-mode sanity checks over the data model's own stated
//! invariants — token buffer structure, pre-token span coverage, and
//! vocabulary bounds — not user-input validation. They compile to no-ops
//! in release builds.

use crate::pretoken::Pretoken;
use crate::vocab::Vocabulary;
use crate::TokenId;

/// Asserts that every token ID in `tokens` names a real vocabulary entry.
#[inline]
pub fn assert_tokens_in_vocab(tokens: &[TokenId], vocab: &Vocabulary) {
    #[cfg(debug_assertions)]
    {
        for (i, &token) in tokens.iter().enumerate() {
            debug_assert!(
                vocab.bytes_of(token).is_some(),
                "invariant violation: tokens[{i}] = {token} has no vocabulary entry"
            );
        }
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (tokens, vocab);
    }
}

/// Asserts that pre-token spans exactly tile `input_len`: sorted by
/// offset, contiguous, non-empty, and summing to the whole input.
#[inline]
pub fn assert_pretokens_tile_input(spans: &[Pretoken], input_len: usize) {
    #[cfg(debug_assertions)]
    {
        let mut expected_offset = 0usize;
        for (i, span) in spans.iter().enumerate() {
            debug_assert!(
                span.length > 0,
                "invariant violation: pretoken[{i}] has zero length"
            );
            debug_assert_eq!(
                span.offset, expected_offset,
                "invariant violation: pretoken[{i}] offset {} does not follow previous span end {}",
                span.offset, expected_offset
            );
            expected_offset = span.offset + span.length;
        }
        debug_assert_eq!(
            expected_offset, input_len,
            "invariant violation: pretoken spans cover {expected_offset} of {input_len} input bytes"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (spans, input_len);
    }
}

/// Asserts the BPE merge engine's output never grows the token count:
/// merging only ever combines two tokens into one.
#[inline]
pub fn assert_merge_does_not_grow(input_len: usize, output_len: usize) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(
            output_len <= input_len,
            "invariant violation: merge output {output_len} tokens exceeds input {input_len} tokens"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (input_len, output_len);
    }
}

/// Asserts a single token ID is a real vocabulary entry.
#[inline]
pub fn assert_valid_token(token: TokenId, vocab: &Vocabulary) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(
            vocab.bytes_of(token).is_some(),
            "invariant violation: token {token} has no vocabulary entry"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (token, vocab);
    }
}

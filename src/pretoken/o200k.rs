//! `o200k_base` pre-tokenizer scanner. Differs from `cl100k_base` in word
//! matching (the upper-ish/lower-ish backtracking rule) and adds `/` to
//! the punctuation trailing set.

use super::{
    contraction_len, digit_run_len, lower_ish_run_len, prefix_len, punctuation_len, scan,
    upper_ish_run_len, whitespace_len,
};
use super::{decode_steps, Pretoken};
use crate::unicode;
use crate::utf8::Step;

const TRAILING: [char; 3] = ['\r', '\n', '/'];

/// Alternative 1: optional prefix, then a backtracking upper-ish/lower-ish
/// run, then an optional contraction suffix.
///
/// The upper-ish run is matched greedily, then shortened one codepoint at
/// a time until the following position has at least one lower-ish
/// codepoint. Each shortening step still only inspects a bounded slice of
/// the pre-token, so the whole scan remains linear in input length.
fn alt_word_lower(steps: &[Step], pos: usize) -> Option<usize> {
    let prefix = prefix_len(steps, pos);
    let base = pos + prefix;
    let max_upper = upper_ish_run_len(steps, base);
    for k in (0..=max_upper).rev() {
        let lower = lower_ish_run_len(steps, base + k);
        if lower > 0 {
            let core_end = base + k + lower;
            let suffix = contraction_len(steps, core_end);
            return Some(prefix + k + lower + suffix);
        }
    }
    None
}

/// Alternative 2: optional prefix, one or more upper-ish codepoints,
/// optional contraction suffix — only when the codepoint immediately after
/// the upper-ish run is itself upper-ish, whitespace, punctuation, symbol,
/// control, or end-of-input (i.e. not lower-ish, which alternative 1 would
/// otherwise have claimed).
fn alt_word_upper(steps: &[Step], pos: usize) -> Option<usize> {
    let prefix = prefix_len(steps, pos);
    let base = pos + prefix;
    let upper = upper_ish_run_len(steps, base);
    if upper == 0 {
        return None;
    }
    let after = base + upper;
    let lookahead_ok = match steps.get(after) {
        None => true,
        Some(step) => {
            let cp = step.ch as u32;
            unicode::is_upper_ish(cp)
                || unicode::is_whitespace(cp)
                || unicode::is_punctuation(cp)
                || unicode::is_symbol(cp)
                || unicode::is_control(cp)
        }
    };
    if !lookahead_ok {
        return None;
    }
    let suffix = contraction_len(steps, after);
    Some(prefix + upper + suffix)
}

fn alt_number(steps: &[Step], pos: usize) -> Option<usize> {
    digit_run_len(steps, pos)
}

fn alt_punctuation(steps: &[Step], pos: usize) -> Option<usize> {
    punctuation_len(steps, pos, &TRAILING)
}

fn alt_whitespace(steps: &[Step], pos: usize) -> Option<usize> {
    whitespace_len(steps, pos)
}

const ALTERNATIVES: &[fn(&[Step], usize) -> Option<usize>] = &[
    alt_word_lower,
    alt_word_upper,
    alt_number,
    alt_punctuation,
    alt_whitespace,
];

pub fn tokenize(bytes: &[u8]) -> Vec<Pretoken> {
    let steps = decode_steps(bytes);
    scan(bytes, &steps, ALTERNATIVES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str) -> Vec<&str> {
        tokenize(text.as_bytes())
            .iter()
            .map(|t| &text[t.offset..t.offset + t.length])
            .collect()
    }

    #[test]
    fn hello_world_scenario() {
        assert_eq!(spans("Hello, world!"), vec!["Hello", ",", " world", "!"]);
    }

    #[test]
    fn three_digit_split() {
        assert_eq!(spans("1234"), vec!["123", "4"]);
    }

    #[test]
    fn all_caps_acronym_uses_upper_branch() {
        // "HTTP" is followed by end-of-input, satisfying alt 2's lookahead;
        // alt 1 would have required a trailing lower-ish run.
        assert_eq!(spans("HTTP"), vec!["HTTP"]);
    }

    #[test]
    fn capitalized_word_uses_lower_branch_with_backtrack() {
        // "Mc" (upper-ish run) backtracks down to "M" + "c" lower-ish run
        // only if "Donald" didn't already satisfy it; plain "Hello" takes
        // k=1 ("H") then lower run "ello" on the first try.
        assert_eq!(spans("Hello"), vec!["Hello"]);
    }

    #[test]
    fn mixed_case_backtracks_to_split_before_final_capital() {
        // Upper-ish run "ABC" has no lower-ish codepoint after any prefix
        // length tried by alt 1 at this position other than k=0, which also
        // fails (next char 'D' is upper-ish, not lower-ish) so alt 1 fails
        // entirely here and alt 2 claims "ABCD" as a whole with lookahead
        // satisfied by end-of-input.
        assert_eq!(spans("ABCD"), vec!["ABCD"]);
    }

    #[test]
    fn contraction_suffix_attaches_to_word() {
        assert_eq!(spans("don't"), vec!["don't"]);
    }

    #[test]
    fn punctuation_does_not_swallow_following_digits() {
        assert_eq!(spans("!123"), vec!["!", "123"]);
    }
}

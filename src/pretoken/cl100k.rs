//! `cl100k_base` pre-tokenizer scanner.

use super::{contraction_len, digit_run_len, prefix_len, punctuation_len, scan, whitespace_len};
use super::{decode_steps, Pretoken};
use crate::unicode;
use crate::utf8::Step;

const TRAILING: [char; 2] = ['\r', '\n'];

/// Alternative 1: a bare contraction suffix (`'s`, `'t`, `'re`, ...).
fn alt_contraction(steps: &[Step], pos: usize) -> Option<usize> {
    match contraction_len(steps, pos) {
        0 => None,
        n => Some(n),
    }
}

/// Alternative 2: optional prefix codepoint, then one or more letters.
fn alt_word(steps: &[Step], pos: usize) -> Option<usize> {
    let prefix = prefix_len(steps, pos);
    let mut n = 0;
    while matches!(steps.get(pos + prefix + n), Some(s) if unicode::is_letter(s.ch as u32)) {
        n += 1;
    }
    if n == 0 {
        None
    } else {
        Some(prefix + n)
    }
}

/// Alternative 3: one to three digit codepoints.
fn alt_number(steps: &[Step], pos: usize) -> Option<usize> {
    digit_run_len(steps, pos)
}

/// Alternative 4: optional space, non-{whitespace,letter,number} run,
/// optional trailing CR/LF run.
fn alt_punctuation(steps: &[Step], pos: usize) -> Option<usize> {
    punctuation_len(steps, pos, &TRAILING)
}

/// Alternatives 5-7: whitespace branches, collapsed (see
/// `super::whitespace_len`).
fn alt_whitespace(steps: &[Step], pos: usize) -> Option<usize> {
    whitespace_len(steps, pos)
}

const ALTERNATIVES: &[fn(&[Step], usize) -> Option<usize>] = &[
    alt_contraction,
    alt_word,
    alt_number,
    alt_punctuation,
    alt_whitespace,
];

pub fn tokenize(bytes: &[u8]) -> Vec<Pretoken> {
    let steps = decode_steps(bytes);
    scan(bytes, &steps, ALTERNATIVES)
}

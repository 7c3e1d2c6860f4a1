//! Pre-tokenizer scanners: hand-written priority-of-alternatives
//! scanners, one per encoding, replacing a regex engine entirely. No
//! backtracking library is used; the `o200k_base` word rule's
//! length-based backtracking is implemented directly as a shrinking loop
//! over a greedy run.
//!
//! Both scanners share the alternative-matching primitives in this module
//! (prefix codepoint, contraction suffix, digit run, whitespace run) and
//! differ only in how they compose them (`cl100k`, `o200k`).

pub mod cl100k;
pub mod o200k;

use crate::unicode;
use crate::utf8::{SafeUtf8Iter, Step};

/// A contiguous slice of the input produced by a scanner, before BPE
/// merging. `is_special` is always `false` for the encodings in scope; it
/// is reserved for a future direct special-token emission path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pretoken {
    pub offset: usize,
    pub length: usize,
    pub is_special: bool,
}

impl Pretoken {
    fn new(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            is_special: false,
        }
    }
}

/// Which vendor encoding's alternative set to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Cl100kBase,
    O200kBase,
}

/// Runs the scanner for `encoding` over `bytes`, returning every pre-token
/// in input order. Span lengths always sum to `bytes.len()`; no span has
/// length zero.
pub fn tokenize(encoding: Encoding, bytes: &[u8]) -> Vec<Pretoken> {
    match encoding {
        Encoding::Cl100kBase => cl100k::tokenize(bytes),
        Encoding::O200kBase => o200k::tokenize(bytes),
    }
}

/// Decodes the whole input once into `(offset, char)` steps up front, so
/// every alternative matcher can look ahead by codepoint index without
/// re-decoding UTF-8.
fn decode_steps(bytes: &[u8]) -> Vec<Step> {
    SafeUtf8Iter::new(bytes).collect()
}

/// Runs a priority list of alternatives at `pos`, committing the first
/// that matches; on total failure, emits a one-byte pre-token so the scan
/// always makes forward progress.
fn scan(bytes: &[u8], steps: &[Step], alternatives: &[fn(&[Step], usize) -> Option<usize>]) -> Vec<Pretoken> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while pos < steps.len() {
        let matched = alternatives.iter().find_map(|alt| alt(steps, pos));
        let (span_len, byte_len) = match matched {
            Some(n) if n > 0 => {
                let start = steps[pos].offset;
                let end = if pos + n < steps.len() {
                    steps[pos + n].offset
                } else {
                    bytes.len()
                };
                (n, end - start)
            }
            _ => (1, steps[pos].len),
        };
        out.push(Pretoken::new(steps[pos].offset, byte_len));
        pos += span_len.max(1);
    }
    out
}

/// Optional single codepoint prefix: anything except CR, LF, a letter, or
/// a number. Shared by the word and contraction-adjacent alternatives of
/// both encodings.
fn prefix_len(steps: &[Step], pos: usize) -> usize {
    let Some(step) = steps.get(pos) else {
        return 0;
    };
    if step.ch == '\r' || step.ch == '\n' {
        return 0;
    }
    let cp = step.ch as u32;
    if unicode::is_letter(cp) || unicode::is_number(cp) {
        return 0;
    }
    1
}

/// English contraction suffix: `'s`/`'t`/`'m`/`'d` (case-insensitive, 2
/// codepoints) or `'re`/`'ve`/`'ll` (case-insensitive, 3 codepoints).
/// Returns 0 when no suffix matches at `pos`.
fn contraction_len(steps: &[Step], pos: usize) -> usize {
    let Some(apos) = steps.get(pos) else {
        return 0;
    };
    if apos.ch != '\'' {
        return 0;
    }
    let Some(c1_step) = steps.get(pos + 1) else {
        return 0;
    };
    let c1 = c1_step.ch.to_ascii_lowercase();
    match c1 {
        's' | 't' | 'm' | 'd' => 2,
        'r' | 'v' | 'l' => {
            let Some(c2_step) = steps.get(pos + 2) else {
                return 0;
            };
            let c2 = c2_step.ch.to_ascii_lowercase();
            let ok = (c1 == 'r' && c2 == 'e') || (c1 == 'v' && c2 == 'e') || (c1 == 'l' && c2 == 'l');
            if ok {
                3
            } else {
                0
            }
        }
        _ => 0,
    }
}

/// Length of the maximal run of digit codepoints at `pos`, capped at 3;
/// longer runs split into successive pre-tokens by being re-scanned from
/// the new position.
fn digit_run_len(steps: &[Step], pos: usize) -> Option<usize> {
    let mut n = 0;
    while n < 3 {
        match steps.get(pos + n) {
            Some(step) if unicode::is_number(step.ch as u32) => n += 1,
            _ => break,
        }
    }
    if n == 0 {
        None
    } else {
        Some(n)
    }
}

/// Punctuation alternative: optional single literal space, then one or
/// more codepoints that are none of {whitespace, letter, number}, then
/// zero or more codepoints drawn from `trailing_set`.
fn punctuation_len(steps: &[Step], pos: usize, trailing_set: &[char]) -> Option<usize> {
    let mut p = pos;
    let mut total = 0usize;
    if matches!(steps.get(p), Some(s) if s.ch == ' ') {
        p += 1;
        total += 1;
    }
    let mut core = 0usize;
    while let Some(step) = steps.get(p) {
        let cp = step.ch as u32;
        if unicode::is_whitespace(cp) || unicode::is_letter(cp) || unicode::is_number(cp) {
            break;
        }
        core += 1;
        p += 1;
    }
    if core == 0 {
        return None;
    }
    total += core;
    while let Some(step) = steps.get(p) {
        if trailing_set.contains(&step.ch) {
            total += 1;
            p += 1;
        } else {
            break;
        }
    }
    Some(total)
}

/// Length of the maximal run of whitespace codepoints at `pos`.
fn whitespace_run_len(steps: &[Step], pos: usize) -> usize {
    let mut n = 0;
    while matches!(steps.get(pos + n), Some(s) if unicode::is_whitespace(s.ch as u32)) {
        n += 1;
    }
    n
}

/// If the maximal whitespace run at `pos` contains a CR or LF, the match
/// stops at the last such character within the run; otherwise the whole
/// run is consumed.
fn whitespace_len(steps: &[Step], pos: usize) -> Option<usize> {
    let run = whitespace_run_len(steps, pos);
    if run == 0 {
        return None;
    }
    let mut last_crlf = None;
    for k in 0..run {
        let ch = steps[pos + k].ch;
        if ch == '\r' || ch == '\n' {
            last_crlf = Some(k);
        }
    }
    Some(last_crlf.map(|k| k + 1).unwrap_or(run))
}

/// "Upper-ish" run length: `Lu ∪ Lt ∪ Lm ∪ Lo ∪ Mark`.
fn upper_ish_run_len(steps: &[Step], pos: usize) -> usize {
    let mut n = 0;
    while matches!(steps.get(pos + n), Some(s) if unicode::is_upper_ish(s.ch as u32)) {
        n += 1;
    }
    n
}

/// "Lower-ish" run length: `Ll ∪ Lm ∪ Lo ∪ Mark`.
fn lower_ish_run_len(steps: &[Step], pos: usize) -> usize {
    let mut n = 0;
    while matches!(steps.get(pos + n), Some(s) if unicode::is_lower_ish(s.ch as u32)) {
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_sum_to_input_length_and_none_are_empty() {
        let text = "Hello, world!\n\t  mixed日本語123456€";
        let toks = tokenize(Encoding::Cl100kBase, text.as_bytes());
        let total: usize = toks.iter().map(|t| t.length).sum();
        assert_eq!(total, text.len());
        assert!(toks.iter().all(|t| t.length > 0));
    }

    #[test]
    fn spans_reconstruct_original_bytes() {
        let text = "café's résumé, naïve!";
        let toks = tokenize(Encoding::O200kBase, text.as_bytes());
        let mut rebuilt = Vec::new();
        for t in &toks {
            rebuilt.extend_from_slice(&text.as_bytes()[t.offset..t.offset + t.length]);
        }
        assert_eq!(rebuilt, text.as_bytes());
    }

    #[test]
    fn forward_progress_on_invalid_utf8() {
        let bytes = [0xFFu8, 0xFE, b'a', b'b', 0x80];
        let toks = tokenize(Encoding::Cl100kBase, &bytes);
        let total: usize = toks.iter().map(|t| t.length).sum();
        assert_eq!(total, bytes.len());
    }

    #[test]
    fn empty_input_yields_no_pretokens() {
        assert!(tokenize(Encoding::Cl100kBase, b"").is_empty());
        assert!(tokenize(Encoding::O200kBase, b"").is_empty());
    }
}

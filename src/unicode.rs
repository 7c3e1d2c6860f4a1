//! Codepoint category predicates used by the pre-tokenizer scanners.
//!
//! Each predicate is a binary search over a static, sorted half-open range
//! table (`unicode_tables.rs`). The category universe matches the scanners'
//! alternatives exactly: letters are further split into `Lu`/`Ll`/`Lt`/`Lm`/
//! `Lo` because the `o200k_base` word rule needs "upper-ish"
//! (`Lu ∪ Lt ∪ Lm ∪ Lo ∪ Mark`) and "lower-ish" (`Ll ∪ Lm ∪ Lo ∪ Mark`) as
//! distinct sets, not just `is_letter`.

use crate::unicode_tables as tbl;

#[inline]
pub fn is_letter(cp: u32) -> bool {
    tbl::contains(tbl::LETTER, cp)
}

#[inline]
pub fn is_lowercase_letter(cp: u32) -> bool {
    tbl::contains(tbl::LOWERCASE_LETTER, cp)
}

#[inline]
pub fn is_uppercase_letter(cp: u32) -> bool {
    tbl::contains(tbl::UPPERCASE_LETTER, cp)
}

#[inline]
pub fn is_titlecase_letter(cp: u32) -> bool {
    tbl::contains(tbl::TITLECASE_LETTER, cp)
}

#[inline]
pub fn is_modifier_letter(cp: u32) -> bool {
    tbl::contains(tbl::MODIFIER_LETTER, cp)
}

#[inline]
pub fn is_other_letter(cp: u32) -> bool {
    tbl::contains(tbl::OTHER_LETTER, cp)
}

#[inline]
pub fn is_mark(cp: u32) -> bool {
    tbl::contains(tbl::MARK, cp)
}

#[inline]
pub fn is_number(cp: u32) -> bool {
    tbl::contains(tbl::NUMBER, cp)
}

#[inline]
pub fn is_punctuation(cp: u32) -> bool {
    tbl::contains(tbl::PUNCTUATION, cp)
}

#[inline]
pub fn is_symbol(cp: u32) -> bool {
    tbl::contains(tbl::SYMBOL, cp)
}

#[inline]
pub fn is_control(cp: u32) -> bool {
    tbl::contains(tbl::CONTROL, cp)
}

#[inline]
pub fn is_whitespace(cp: u32) -> bool {
    tbl::contains(tbl::WHITESPACE, cp)
}

/// "Upper-ish" for the `o200k_base` word rule: `Lu ∪ Lt ∪ Lm ∪ Lo ∪ Mark`.
#[inline]
pub fn is_upper_ish(cp: u32) -> bool {
    is_uppercase_letter(cp) || is_titlecase_letter(cp) || is_modifier_letter(cp)
        || is_other_letter(cp)
        || is_mark(cp)
}

/// "Lower-ish" for the `o200k_base` word rule: `Ll ∪ Lm ∪ Lo ∪ Mark`.
#[inline]
pub fn is_lower_ish(cp: u32) -> bool {
    is_lowercase_letter(cp) || is_modifier_letter(cp) || is_other_letter(cp) || is_mark(cp)
}

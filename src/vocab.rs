//! Embedded vocabulary loader.
//!
//! Parses the `BPE2` binary blob format: a fixed 64-byte header, a compact
//! table of `(offset, length)` pairs into a trailing byte blob, and the blob
//! itself. The loader performs no I/O — it is a pure parser over a byte
//! slice, so it runs unchanged over an `include_bytes!`-embedded asset or
//! a buffer built in a test.
//!
//! Token ids double as merge ranks, the way `cl100k_base.tiktoken`-style
//! vocabularies are actually built: a merge of `left`/`right` exists iff the
//! concatenation of their byte sequences is itself a vocabulary entry, and
//! that entry's id *is* the merge's rank (smaller id = learned earlier =
//! higher priority). No separate merge-rule table is stored.

use crate::error::Error;
use std::collections::HashMap;

pub const MAGIC: &[u8; 4] = b"BPE2";
pub const HEADER_LEN: usize = 64;
pub const SUPPORTED_VERSION: u32 = 2;
pub const MAX_TOKEN_BYTES: usize = 128;

/// The immutable, bijective token vocabulary plus derived lookup
/// structures.
pub struct Vocabulary {
    /// `bytes_of(id)` via direct indexing; `None` marks a reserved hole.
    by_id: Vec<Option<Box<[u8]>>>,
    /// `rank_of(bytes) -> token_id` via exact-match hash lookup.
    by_bytes: HashMap<Box<[u8]>, u32>,
    byte_to_initial_token: [u32; 256],
}

impl Vocabulary {
    /// Parses a `BPE2` blob. Rejects on magic mismatch, unknown version, or
    /// truncation; a duplicate token-bytes entry or a byte with no
    /// single-byte token is a data-integrity failure.
    pub fn parse(blob: &[u8]) -> Result<Self, Error> {
        if blob.len() < HEADER_LEN {
            return Err(Error::VocabularyError("truncated header".into()));
        }
        if &blob[0..4] != MAGIC {
            return Err(Error::VocabularyError("bad magic".into()));
        }
        let version = read_u32(blob, 4);
        if version != SUPPORTED_VERSION {
            return Err(Error::VocabularyError(format!(
                "unsupported version: {version}"
            )));
        }
        let token_count = read_u32(blob, 8) as usize;
        let max_token_len = read_u32(blob, 12) as usize;
        let blob_size = read_u32(blob, 16) as usize;
        let source_hash = &blob[20..52];

        let table_start = HEADER_LEN;
        let table_len = token_count
            .checked_mul(8)
            .ok_or_else(|| Error::VocabularyError("token count overflow".into()))?;
        let table_end = table_start
            .checked_add(table_len)
            .ok_or_else(|| Error::VocabularyError("table length overflow".into()))?;
        if blob.len() < table_end {
            return Err(Error::VocabularyError("truncated token table".into()));
        }
        let data_start = table_end;
        let data_end = data_start
            .checked_add(blob_size)
            .ok_or_else(|| Error::VocabularyError("blob size overflow".into()))?;
        if blob.len() < data_end {
            return Err(Error::VocabularyError("truncated blob data".into()));
        }
        let data = &blob[data_start..data_end];

        let computed_hash = blake3::hash(data);
        if computed_hash.as_bytes().as_slice() != source_hash {
            return Err(Error::VocabularyError(
                "source_hash mismatch: blob is corrupt or truncated".into(),
            ));
        }

        let mut by_id: Vec<Option<Box<[u8]>>> = Vec::with_capacity(token_count);
        let mut by_bytes: HashMap<Box<[u8]>, u32> = HashMap::with_capacity(token_count);
        for i in 0..token_count {
            let entry_off = table_start + i * 8;
            let offset = read_u32(blob, entry_off) as usize;
            let length = read_u32(blob, entry_off + 4) as usize;
            if length == 0 {
                by_id.push(None);
                continue;
            }
            if length > max_token_len || length > MAX_TOKEN_BYTES {
                return Err(Error::VocabularyError(format!(
                    "token {i} exceeds max token length"
                )));
            }
            let end = offset
                .checked_add(length)
                .ok_or_else(|| Error::VocabularyError("token span overflow".into()))?;
            if end > data.len() {
                return Err(Error::VocabularyError(format!(
                    "token {i} span out of bounds"
                )));
            }
            let bytes: Box<[u8]> = data[offset..end].into();
            if by_bytes.insert(bytes.clone(), i as u32).is_some() {
                return Err(Error::VocabularyError(format!(
                    "duplicate token bytes at id {i}"
                )));
            }
            by_id.push(Some(bytes));
        }

        let mut byte_to_initial_token = [u32::MAX; 256];
        for b in 0u32..256 {
            let key = [b as u8];
            match by_bytes.get(key.as_slice()) {
                Some(&id) => byte_to_initial_token[b as usize] = id,
                None => {
                    return Err(Error::VocabularyError(format!(
                        "missing single-byte token for byte 0x{b:02X}"
                    )))
                }
            }
        }

        tracing::debug!(token_count, blob_size, "parsed vocabulary blob");

        Ok(Self {
            by_id,
            by_bytes,
            byte_to_initial_token,
        })
    }

    #[inline]
    pub fn rank_of(&self, bytes: &[u8]) -> Option<u32> {
        self.by_bytes.get(bytes).copied()
    }

    #[inline]
    pub fn bytes_of(&self, token_id: u32) -> Option<&[u8]> {
        self.by_id.get(token_id as usize)?.as_deref()
    }

    #[inline]
    pub fn byte_to_initial_token(&self, byte: u8) -> u32 {
        self.byte_to_initial_token[byte as usize]
    }

    /// Looks up the merge rule for an adjacent token pair: if the
    /// concatenation of their byte sequences is itself a vocabulary entry,
    /// that entry's id is both the merged token id and the merge's rank.
    #[inline]
    pub fn merge_for(&self, left: u32, right: u32) -> Option<(u32, u32)> {
        let left_bytes = self.bytes_of(left)?;
        let right_bytes = self.bytes_of(right)?;
        let mut concat = Vec::with_capacity(left_bytes.len() + right_bytes.len());
        concat.extend_from_slice(left_bytes);
        concat.extend_from_slice(right_bytes);
        let merged = self.rank_of(&concat)?;
        Some((merged, merged))
    }

    pub fn n_tokens(&self) -> usize {
        self.by_id.len()
    }
}

#[inline]
fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a minimal valid BPE2 blob: 256 single-byte tokens (ids
    /// 0..256, bytes_of(i) == [i]) plus `extra` additional multi-byte
    /// tokens, no merges.
    fn build_blob(extra: &[&[u8]]) -> Vec<u8> {
        let mut data = Vec::new();
        let mut entries: Vec<(u32, u32)> = Vec::new();
        for b in 0u8..=255 {
            let off = data.len() as u32;
            data.push(b);
            entries.push((off, 1));
        }
        for tok in extra {
            let off = data.len() as u32;
            data.extend_from_slice(tok);
            entries.push((off, tok.len() as u32));
        }
        let token_count = entries.len() as u32;
        let max_len = extra.iter().map(|t| t.len()).max().unwrap_or(1).max(1) as u32;
        let blob_size = data.len() as u32;
        let hash = blake3::hash(&data);

        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&SUPPORTED_VERSION.to_le_bytes());
        out.extend_from_slice(&token_count.to_le_bytes());
        out.extend_from_slice(&max_len.to_le_bytes());
        out.extend_from_slice(&blob_size.to_le_bytes());
        out.extend_from_slice(hash.as_bytes());
        out.extend_from_slice(&[0u8; 12]);
        assert_eq!(out.len(), HEADER_LEN);
        for (off, len) in &entries {
            out.extend_from_slice(&off.to_le_bytes());
            out.extend_from_slice(&len.to_le_bytes());
        }
        out.extend_from_slice(&data);
        out
    }

    #[test]
    fn parses_minimal_byte_vocab() {
        let blob = build_blob(&[]);
        let vocab = Vocabulary::parse(&blob).unwrap();
        assert_eq!(vocab.n_tokens(), 256);
        for b in 0u8..=255 {
            assert_eq!(vocab.byte_to_initial_token(b), b as u32);
            assert_eq!(vocab.bytes_of(b as u32), Some(&[b][..]));
        }
    }

    #[test]
    fn rejects_bad_magic() {
        let mut blob = build_blob(&[]);
        blob[0] = b'X';
        assert!(Vocabulary::parse(&blob).is_err());
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut blob = build_blob(&[]);
        blob[4..8].copy_from_slice(&99u32.to_le_bytes());
        assert!(Vocabulary::parse(&blob).is_err());
    }

    #[test]
    fn rejects_truncated_blob() {
        let blob = build_blob(&[]);
        let truncated = &blob[..blob.len() - 10];
        assert!(Vocabulary::parse(truncated).is_err());
    }

    #[test]
    fn rejects_corrupted_hash() {
        let mut blob = build_blob(&[]);
        let last = blob.len() - 1;
        blob[last] ^= 0xFF;
        assert!(Vocabulary::parse(&blob).is_err());
    }

    #[test]
    fn extra_multibyte_tokens_resolve_and_merge() {
        let blob = build_blob(&[b"t", b"he", b"the"]);
        let vocab = Vocabulary::parse(&blob).unwrap();
        let t = vocab.rank_of(b"t").unwrap();
        let he = vocab.rank_of(b"he").unwrap();
        let the = vocab.rank_of(b"the").unwrap();
        assert_eq!(vocab.merge_for(t, he), Some((the, the)));
    }

    #[test]
    fn no_merge_when_concatenation_not_in_vocab() {
        let blob = build_blob(&[b"zz"]);
        let vocab = Vocabulary::parse(&blob).unwrap();
        let a = vocab.byte_to_initial_token(b'a');
        let b = vocab.byte_to_initial_token(b'b');
        assert_eq!(vocab.merge_for(a, b), None);
    }
}

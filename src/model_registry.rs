//! Model registry: resolves a user-supplied model alias to an encoding
//! and an accuracy tier.
//!
//! Unknown names fall back to a heuristic count (`ceil(byte_length / 4)`)
//! tagged `estimate`. The heuristic is the only non-exact branch and is
//! always surfaced through the `accuracy` field; it is never silently
//! promoted to `exact`.

use crate::pretoken::Encoding;

/// How faithful a token count is to the vendor's own tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    Exact,
    Heuristic,
    Estimate,
}

impl Accuracy {
    pub fn as_str(self) -> &'static str {
        match self {
            Accuracy::Exact => "exact",
            Accuracy::Heuristic => "heuristic",
            Accuracy::Estimate => "estimate",
        }
    }
}

/// What resolving a model name gets you: which encoding to run and how
/// trustworthy the resulting count is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub encoding: Encoding,
    pub accuracy: Accuracy,
}

/// Canonical name -> spec. Every entry here is `exact`: the encoding is
/// the vendor-published one for that model family.
const CANONICAL: &[(&str, ModelSpec)] = &[
    (
        "openai/gpt-4o",
        ModelSpec {
            encoding: Encoding::O200kBase,
            accuracy: Accuracy::Exact,
        },
    ),
    (
        "openai/gpt-4o-mini",
        ModelSpec {
            encoding: Encoding::O200kBase,
            accuracy: Accuracy::Exact,
        },
    ),
    (
        "openai/o1",
        ModelSpec {
            encoding: Encoding::O200kBase,
            accuracy: Accuracy::Exact,
        },
    ),
    (
        "openai/gpt-4-turbo",
        ModelSpec {
            encoding: Encoding::Cl100kBase,
            accuracy: Accuracy::Exact,
        },
    ),
    (
        "openai/gpt-4",
        ModelSpec {
            encoding: Encoding::Cl100kBase,
            accuracy: Accuracy::Exact,
        },
    ),
    (
        "openai/gpt-3.5-turbo",
        ModelSpec {
            encoding: Encoding::Cl100kBase,
            accuracy: Accuracy::Exact,
        },
    ),
    (
        "openai/text-embedding-ada-002",
        ModelSpec {
            encoding: Encoding::Cl100kBase,
            accuracy: Accuracy::Exact,
        },
    ),
];

/// Short alias -> canonical name. Resolution always goes alias -> canonical
/// -> `ModelSpec`, so every alias inherits its canonical entry's accuracy.
const ALIASES: &[(&str, &str)] = &[
    ("gpt-4o", "openai/gpt-4o"),
    ("gpt-4o-mini", "openai/gpt-4o-mini"),
    ("o1", "openai/o1"),
    ("gpt-4-turbo", "openai/gpt-4-turbo"),
    ("gpt-4", "openai/gpt-4"),
    ("gpt-3.5-turbo", "openai/gpt-3.5-turbo"),
    ("gpt-3.5", "openai/gpt-3.5-turbo"),
    ("text-embedding-ada-002", "openai/text-embedding-ada-002"),
];

fn canonical_spec(name: &str) -> Option<ModelSpec> {
    CANONICAL
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, spec)| *spec)
}

fn resolve_alias(name: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
}

/// Resolves `model` (either a canonical name or a known alias) to a
/// `ModelSpec`. Unknown names return `None`; the caller is expected to fall
/// back to `heuristic_tokens`.
pub fn resolve(model: &str) -> Option<ModelSpec> {
    canonical_spec(model).or_else(|| resolve_alias(model).and_then(canonical_spec))
}

/// The only non-exact counting path: `ceil(byte_length / 4)`, tagged
/// `estimate` by the caller.
pub fn heuristic_tokens(byte_length: usize) -> usize {
    byte_length.div_ceil(4).max(if byte_length > 0 { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_resolves_exact() {
        let spec = resolve("openai/gpt-4o").unwrap();
        assert_eq!(spec.accuracy, Accuracy::Exact);
        assert_eq!(spec.encoding, Encoding::O200kBase);
    }

    #[test]
    fn alias_resolves_through_canonical() {
        let spec = resolve("gpt-4o").unwrap();
        assert_eq!(spec, resolve("openai/gpt-4o").unwrap());
    }

    #[test]
    fn unknown_model_has_no_spec() {
        assert!(resolve("some-vendor/unknown-model").is_none());
    }

    #[test]
    fn heuristic_rounds_up_to_nearest_four_bytes() {
        assert_eq!(heuristic_tokens(0), 0);
        assert_eq!(heuristic_tokens(1), 1);
        assert_eq!(heuristic_tokens(4), 1);
        assert_eq!(heuristic_tokens(5), 2);
        assert_eq!(heuristic_tokens(8), 2);
    }

    #[test]
    fn cl100k_family_maps_correctly() {
        let spec = resolve("gpt-4").unwrap();
        assert_eq!(spec.encoding, Encoding::Cl100kBase);
    }
}

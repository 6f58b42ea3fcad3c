//! Longest-first literal substitution over plain text.
//!
//! Keys are applied one at a time, longest first. Applying `"Bobby Lim"`
//! before `"Bobby"` keeps the shorter key from splitting the longer literal.
//! Text produced by a replacement is never searched again, so a short key
//! such as `"0"` cannot match inside an inserted `<PERSON_0>`.
//!
//! Matching is literal and has no notion of word boundaries: a key that
//! occurs inside an unrelated longer word is replaced too.

use crate::mapping::{SubstitutionMap, UnmaskingMap};
use crate::placeholder::Allocation;

/// Outcome of a substitution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    /// Text after all keys were applied
    pub text: String,
    /// Total number of occurrences replaced
    pub replacements: usize,
}

impl Substituted {
    /// Whether the pass left the text untouched
    pub fn is_unchanged(&self) -> bool {
        self.replacements == 0
    }
}

/// Piece of text during a substitution pass
enum Segment {
    /// Source text still open to matching
    Raw(String),
    /// Output of a replacement
    Replaced(String),
}

impl Segment {
    fn as_str(&self) -> &str {
        match self {
            Segment::Raw(text) | Segment::Replaced(text) => text,
        }
    }
}

/// Applies substitution tables to text
pub struct TextTransformer;

impl TextTransformer {
    /// Replaces every occurrence of every key of `map`, longest key first.
    ///
    /// Only text that no earlier key replaced is searched.
    pub fn apply(text: &str, map: &SubstitutionMap) -> Substituted {
        let mut segments = vec![Segment::Raw(text.to_string())];
        let mut replacements = 0;

        for (key, value) in map.longest_first() {
            if key.is_empty() {
                continue;
            }

            let mut next = Vec::with_capacity(segments.len());
            for segment in segments {
                match segment {
                    Segment::Raw(raw) if raw.contains(key) => {
                        let mut rest = raw.as_str();
                        while let Some(at) = rest.find(key) {
                            if at > 0 {
                                next.push(Segment::Raw(rest[..at].to_string()));
                            }
                            next.push(Segment::Replaced(value.to_string()));
                            replacements += 1;
                            rest = &rest[at + key.len()..];
                        }
                        if !rest.is_empty() {
                            next.push(Segment::Raw(rest.to_string()));
                        }
                    }
                    other => next.push(other),
                }
            }
            segments = next;
        }

        Substituted {
            text: segments.iter().map(Segment::as_str).collect(),
            replacements,
        }
    }

    /// Replaces original literals with their placeholders
    pub fn mask(text: &str, allocation: &Allocation) -> Substituted {
        Self::apply(text, &allocation.masking)
    }

    /// Restores original literals from their placeholders
    pub fn unmask(text: &str, map: &UnmaskingMap) -> Substituted {
        Self::apply(text, &map.to_substitutions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_key_applied_first() {
        let map: SubstitutionMap = [("Bobby", "<PERSON_1>"), ("Bobby Lim", "<PERSON_0>")]
            .into_iter()
            .collect();

        let out = TextTransformer::apply("Bobby Lim called Bobby", &map);
        assert_eq!(out.text, "<PERSON_0> called <PERSON_1>");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let map: SubstitutionMap = [("ann", "X")].into_iter().collect();
        let out = TextTransformer::apply("ann, ann and ann", &map);
        assert_eq!(out.text, "X, X and X");
        assert_eq!(out.replacements, 3);
    }

    #[test]
    fn test_no_word_boundaries() {
        let map: SubstitutionMap = [("Ann", "<PERSON_0>")].into_iter().collect();
        let out = TextTransformer::apply("Annual report by Ann", &map);
        assert_eq!(out.text, "<PERSON_0>ual report by <PERSON_0>");
    }

    #[test]
    fn test_empty_map_is_noop() {
        let out = TextTransformer::apply("nothing to see", &SubstitutionMap::new());
        assert_eq!(out.text, "nothing to see");
        assert!(out.is_unchanged());
    }

    #[test]
    fn test_empty_key_ignored() {
        let map: SubstitutionMap = [("", "X")].into_iter().collect();
        let out = TextTransformer::apply("abc", &map);
        assert_eq!(out.text, "abc");
    }

    #[test]
    fn test_short_key_skips_inserted_placeholder() {
        let map: SubstitutionMap = [("Ann Lee", "<PERSON_0>"), ("0", "<ID_0>")]
            .into_iter()
            .collect();

        let out = TextTransformer::apply("Ann Lee room 0", &map);
        assert_eq!(out.text, "<PERSON_0> room <ID_0>");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn test_restored_text_not_rescanned() {
        // The restored literal looks like another placeholder
        let map: UnmaskingMap = [("<A_0>", "<B_0>"), ("<B_0>", "b")].into_iter().collect();
        let out = TextTransformer::unmask("<A_0> <B_0>", &map);
        assert_eq!(out.text, "<B_0> b");
    }

    #[test]
    fn test_unmask_restores() {
        let map: UnmaskingMap = [("<PERSON_0>", "Bobby Lim"), ("<PERSON_1>", "Bobby")]
            .into_iter()
            .collect();
        let out = TextTransformer::unmask("<PERSON_0> called <PERSON_1>", &map);
        assert_eq!(out.text, "Bobby Lim called Bobby");
    }
}

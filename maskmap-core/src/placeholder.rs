//! Placeholder tokens and their allocation per distinct literal

use crate::mapping::{SubstitutionMap, UnmaskingMap};
use crate::span::DetectedSpan;
use std::collections::BTreeMap;
use std::fmt;

/// A type-scoped, counter-suffixed token such as `<PERSON_0>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placeholder {
    /// Entity label the token stands for
    pub entity_type: String,
    /// Zero-based position among the distinct literals of this type
    pub index: usize,
}

impl Placeholder {
    /// Create a placeholder
    pub fn new(entity_type: impl Into<String>, index: usize) -> Self {
        Self {
            entity_type: entity_type.into(),
            index,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}_{}>", self.entity_type, self.index)
    }
}

/// Result of allocating placeholders for one job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Original literal to placeholder, in first-seen order
    pub masking: SubstitutionMap,
    /// Placeholder to original literal
    pub unmasking: UnmaskingMap,
    /// Number of placeholders handed out per entity type
    pub counters: BTreeMap<String, usize>,
}

impl Allocation {
    /// Whether no placeholder was allocated
    pub fn is_empty(&self) -> bool {
        self.masking.is_empty()
    }

    /// Number of distinct literals that received a placeholder
    pub fn len(&self) -> usize {
        self.masking.len()
    }
}

/// Assigns one placeholder per distinct literal
pub struct PlaceholderAllocator;

impl PlaceholderAllocator {
    /// Allocates placeholders for the literals covered by `reduced`.
    ///
    /// Spans are walked in order. A literal keeps the entity type it was
    /// first seen with, and every later occurrence of the same text reuses
    /// its token. Counters are per type and only advance for a new literal.
    /// Zero-length spans are skipped.
    ///
    /// Spans are expected to have been validated against `text` (see
    /// [`SpanReducer::reduce`](crate::SpanReducer::reduce)); a span that does
    /// not fit `text` is ignored.
    pub fn allocate(text: &str, reduced: &[DetectedSpan]) -> Allocation {
        let mut allocation = Allocation::default();

        for span in reduced {
            let literal = match span.literal(text) {
                Some(literal) if !literal.is_empty() => literal,
                _ => continue,
            };
            if allocation.masking.get(literal).is_some() {
                continue;
            }

            let counter = allocation
                .counters
                .entry(span.entity_type.clone())
                .or_insert(0);
            let token = Placeholder::new(span.entity_type.as_str(), *counter).to_string();
            *counter += 1;

            allocation.masking.insert(literal, token.as_str());
            allocation.unmasking.insert(token, literal);
        }

        allocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, ty: &str) -> DetectedSpan {
        DetectedSpan::new(start, end, ty)
    }

    #[test]
    fn test_placeholder_display() {
        assert_eq!(Placeholder::new("EMAIL_ADDRESS", 3).to_string(), "<EMAIL_ADDRESS_3>");
    }

    #[test]
    fn test_repeated_literal_shares_token() {
        let text = "Bobby Lim, Bobby Lim and Bobby Lim";
        let spans = vec![span(0, 9, "PERSON"), span(11, 20, "PERSON"), span(25, 34, "PERSON")];

        let allocation = PlaceholderAllocator::allocate(text, &spans);
        assert_eq!(allocation.len(), 1);
        assert_eq!(allocation.masking.get("Bobby Lim"), Some("<PERSON_0>"));
        assert_eq!(allocation.unmasking.get("<PERSON_0>"), Some("Bobby Lim"));
        assert_eq!(allocation.counters.get("PERSON"), Some(&1));
    }

    #[test]
    fn test_counters_are_per_type() {
        let text = "Ann a@b.io Bea c@d.io";
        let spans = vec![
            span(0, 3, "PERSON"),
            span(4, 10, "EMAIL_ADDRESS"),
            span(11, 14, "PERSON"),
            span(15, 21, "EMAIL_ADDRESS"),
        ];

        let allocation = PlaceholderAllocator::allocate(text, &spans);
        assert_eq!(allocation.masking.get("Ann"), Some("<PERSON_0>"));
        assert_eq!(allocation.masking.get("Bea"), Some("<PERSON_1>"));
        assert_eq!(allocation.masking.get("a@b.io"), Some("<EMAIL_ADDRESS_0>"));
        assert_eq!(allocation.masking.get("c@d.io"), Some("<EMAIL_ADDRESS_1>"));
    }

    #[test]
    fn test_first_seen_type_wins() {
        let text = "Paris in Paris";
        let spans = vec![span(0, 5, "PERSON"), span(9, 14, "LOCATION")];

        let allocation = PlaceholderAllocator::allocate(text, &spans);
        assert_eq!(allocation.len(), 1);
        assert_eq!(allocation.masking.get("Paris"), Some("<PERSON_0>"));
        assert!(!allocation.counters.contains_key("LOCATION"));
    }

    #[test]
    fn test_empty_spans_allocate_nothing() {
        let allocation = PlaceholderAllocator::allocate("abc", &[span(1, 1, "X")]);
        assert!(allocation.is_empty());

        let allocation = PlaceholderAllocator::allocate("abc", &[]);
        assert!(allocation.is_empty());
        assert!(allocation.unmasking.is_empty());
    }
}

//! Detected spans and the containment-based span reducer.
//!
//! Detectors report PII as `[start, end)` byte ranges that may nest or
//! overlap. [`SpanReducer`] turns them into a deterministic set in which no
//! accepted span lies inside another accepted span.

use crate::error::{CoreError, Result, SpanFault};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A PII range reported by a detector
///
/// Offsets are UTF-8 byte offsets into the text the detector was run on.
/// `entity_type` is whatever label the detector uses (`PERSON`,
/// `EMAIL_ADDRESS`, ...); it is never validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectedSpan {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
    /// Detector-assigned entity label
    pub entity_type: String,
}

impl DetectedSpan {
    /// Create a new span
    pub fn new(start: usize, end: usize, entity_type: impl Into<String>) -> Self {
        Self {
            start,
            end,
            entity_type: entity_type.into(),
        }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `self` lies fully inside (or equals) `other`
    pub fn is_within(&self, other: &DetectedSpan) -> bool {
        self.start >= other.start && self.end <= other.end
    }

    /// Whether the two ranges share at least one byte
    pub fn overlaps(&self, other: &DetectedSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The literal text covered by this span
    ///
    /// Returns `None` when the span does not describe a valid range of `text`.
    pub fn literal<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }

    fn check(&self, text: &str) -> Result<()> {
        let fault = if self.start > self.end {
            Some(SpanFault::Reversed)
        } else if self.end > text.len() {
            Some(SpanFault::OutOfBounds)
        } else if !text.is_char_boundary(self.start) || !text.is_char_boundary(self.end) {
            Some(SpanFault::NotCharBoundary)
        } else {
            None
        };

        match fault {
            Some(reason) => Err(CoreError::InvalidSpan {
                start: self.start,
                end: self.end,
                len: text.len(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Reduces overlapping or nested detections to outermost spans
pub struct SpanReducer;

impl SpanReducer {
    /// Checks every span against `text`.
    ///
    /// Malformed spans are reported, never clamped.
    pub fn validate(text: &str, spans: &[DetectedSpan]) -> Result<()> {
        spans.iter().try_for_each(|span| span.check(text))
    }

    /// Validates and reduces `spans`.
    ///
    /// Spans are ordered by `(start asc, end desc)` so that, for a shared
    /// start, the longer span is seen first. A candidate is dropped when it
    /// lies inside an already accepted span; everything else is accepted,
    /// including spans that only partially overlap an accepted one.
    ///
    /// The result is ordered the same way and reducing it again yields the
    /// same spans.
    pub fn reduce(text: &str, spans: &[DetectedSpan]) -> Result<Vec<DetectedSpan>> {
        Self::validate(text, spans)?;
        Ok(Self::reduce_unchecked(spans))
    }

    /// Reduction without validation against a text buffer.
    pub fn reduce_unchecked(spans: &[DetectedSpan]) -> Vec<DetectedSpan> {
        let mut ordered: Vec<&DetectedSpan> = spans.iter().collect();
        // Stable: identical ranges keep detector order, so the first label wins
        ordered.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut accepted: Vec<DetectedSpan> = Vec::with_capacity(ordered.len());
        for candidate in ordered {
            if !accepted.iter().any(|kept| candidate.is_within(kept)) {
                accepted.push(candidate.clone());
            }
        }

        accepted
    }
}

/// Converts spans expressed in character offsets into byte-offset spans.
///
/// Detectors written for languages that index strings by code point report
/// character offsets; the rest of this crate works on byte offsets.
pub fn spans_from_char_offsets(text: &str, spans: &[DetectedSpan]) -> Result<Vec<DetectedSpan>> {
    let byte_offsets: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = byte_offsets.len() - 1;

    spans
        .iter()
        .map(|span| {
            let invalid = |reason| CoreError::InvalidSpan {
                start: span.start,
                end: span.end,
                len: char_len,
                reason,
            };

            if span.start > span.end {
                return Err(invalid(SpanFault::Reversed));
            }
            match (byte_offsets.get(span.start), byte_offsets.get(span.end)) {
                (Some(&start), Some(&end)) => {
                    Ok(DetectedSpan::new(start, end, span.entity_type.clone()))
                }
                _ => Err(invalid(SpanFault::OutOfBounds)),
            }
        })
        .collect()
}

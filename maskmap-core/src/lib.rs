//! Reversible PII masking primitives
//!
//! This crate holds the pure, I/O-free part of maskmap:
//!
//! - [`SpanReducer`] turns overlapping detector output into outermost spans
//! - [`PlaceholderAllocator`] gives every distinct literal one `<TYPE_N>` token
//! - [`TextTransformer`] applies a table longest key first, in either direction
//! - [`burn_in`] does the same for paginated documents, committing per key
//!
//! # Example
//!
//! ```rust
//! use maskmap_core::{mask, unmask, DetectedSpan};
//!
//! let text = "Bobby Lim called Bobby";
//! let spans = vec![
//!     DetectedSpan::new(0, 9, "PERSON"),
//!     DetectedSpan::new(0, 5, "PERSON"),
//!     DetectedSpan::new(17, 22, "PERSON"),
//! ];
//!
//! let outcome = mask(text, &spans).unwrap();
//! assert_eq!(outcome.text, "<PERSON_0> called <PERSON_1>");
//! assert_eq!(unmask(&outcome.text, &outcome.allocation.unmasking), text);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod mapping;
pub mod paged;
pub mod placeholder;
pub mod span;
pub mod transform;

pub use error::{CoreError, Result, SpanFault};
pub use mapping::{SubstitutionMap, UnmaskingMap};
pub use paged::{burn_in, BurnInReport, PagedDocument, TextPages, TextRegion};
pub use placeholder::{Allocation, Placeholder, PlaceholderAllocator};
pub use span::{spans_from_char_offsets, DetectedSpan, SpanReducer};
pub use transform::{Substituted, TextTransformer};

/// Result of masking one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masked {
    /// Masked text
    pub text: String,
    /// Spans that survived reduction
    pub reduced: Vec<DetectedSpan>,
    /// Placeholder tables for this text
    pub allocation: Allocation,
}

/// Reduces `spans`, allocates placeholders and masks `text`.
pub fn mask(text: &str, spans: &[DetectedSpan]) -> Result<Masked> {
    let reduced = SpanReducer::reduce(text, spans)?;
    let allocation = PlaceholderAllocator::allocate(text, &reduced);
    let masked = TextTransformer::mask(text, &allocation);

    Ok(Masked {
        text: masked.text,
        reduced,
        allocation,
    })
}

/// Restores the originals of a masked text.
pub fn unmask(masked: &str, map: &UnmaskingMap) -> String {
    TextTransformer::unmask(masked, map).text
}

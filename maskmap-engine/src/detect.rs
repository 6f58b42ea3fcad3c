//! Detector adapters
//!
//! The engine never detects PII on its own; it calls whatever [`Detector`]
//! the caller injects. Entity labels are passed through untouched.

use crate::error::{EngineError, Result};
use maskmap_core::{spans_from_char_offsets, DetectedSpan};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Source of PII spans for a text
pub trait Detector: Send + Sync {
    /// Spans found in `text`, as byte offsets
    fn detect(&self, text: &str) -> Result<Vec<DetectedSpan>>;
}

/// A user-supplied pattern for one entity label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Label reported for matches
    pub entity_type: String,
    /// Regular expression (regex crate syntax)
    pub pattern: String,
}

/// Reports every match of a list of configured patterns
#[derive(Debug, Clone)]
pub struct PatternDetector {
    rules: Vec<(String, Regex)>,
}

impl PatternDetector {
    /// Compiles `rules`
    pub fn new(rules: &[PatternRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|regex| (rule.entity_type.clone(), regex))
                    .map_err(|e| {
                        EngineError::Config(format!(
                            "pattern for {} is invalid: {}",
                            rule.entity_type, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no pattern is configured
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Detector for PatternDetector {
    fn detect(&self, text: &str) -> Result<Vec<DetectedSpan>> {
        Ok(self
            .rules
            .iter()
            .flat_map(|(entity_type, regex)| {
                regex
                    .find_iter(text)
                    .map(move |m| DetectedSpan::new(m.start(), m.end(), entity_type.as_str()))
            })
            .collect())
    }
}

/// Replays spans computed elsewhere, e.g. by an external NLP service
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    spans: Vec<DetectedSpan>,
    char_offsets: bool,
}

impl StaticDetector {
    /// Spans given in byte offsets
    pub fn new(spans: Vec<DetectedSpan>) -> Self {
        Self {
            spans,
            char_offsets: false,
        }
    }

    /// Spans given in character offsets
    pub fn with_char_offsets(spans: Vec<DetectedSpan>) -> Self {
        Self {
            spans,
            char_offsets: true,
        }
    }

    /// Reads a JSON array of `{start, end, entity_type}` objects
    pub fn from_json(json: &str, char_offsets: bool) -> Result<Self> {
        let spans: Vec<DetectedSpan> = serde_json::from_str(json)?;
        Ok(Self {
            spans,
            char_offsets,
        })
    }
}

impl Detector for StaticDetector {
    fn detect(&self, text: &str) -> Result<Vec<DetectedSpan>> {
        if self.char_offsets {
            Ok(spans_from_char_offsets(text, &self.spans)?)
        } else {
            Ok(self.spans.clone())
        }
    }
}

//! Parse-or-fallback handling of completion text.
//!
//! The model is asked for a JSON array but may wrap it in prose or ignore
//! the format entirely. Extraction takes everything from the first `[` to
//! the last `]` and parses it strictly. Anything that does not yield at
//! least one well-formed recommendation becomes a single fallback entry
//! carrying the whole response text.

use serde::{Deserialize, Serialize};

pub const FALLBACK_TITLE: &str = "AI Analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// One natural-language recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub confidence: Confidence,
}

impl Recommendation {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        confidence: Confidence,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            confidence,
        }
    }
}

/// Outcome of parsing completion text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecommendations {
    /// A JSON array was found and parsed
    Structured(Vec<Recommendation>),
    /// No usable array; the whole text wrapped as one medium-confidence entry
    Fallback(Recommendation),
}

impl ParsedRecommendations {
    pub fn is_structured(&self) -> bool {
        matches!(self, ParsedRecommendations::Structured(_))
    }

    pub fn into_vec(self) -> Vec<Recommendation> {
        match self {
            ParsedRecommendations::Structured(items) => items,
            ParsedRecommendations::Fallback(item) => vec![item],
        }
    }
}

/// Slice from the first `[` through the last `]`, if both exist in order.
fn extract_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_recommendations(text: &str) -> ParsedRecommendations {
    let structured = extract_array(text)
        .and_then(|json| serde_json::from_str::<Vec<Recommendation>>(json).ok())
        .filter(|items| !items.is_empty());

    match structured {
        Some(items) => ParsedRecommendations::Structured(items),
        None => {
            tracing::debug!("completion text had no parseable recommendation array");
            ParsedRecommendations::Fallback(Recommendation::new(
                FALLBACK_TITLE,
                text,
                Confidence::Medium,
            ))
        }
    }
}

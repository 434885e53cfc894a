//! Quote gateway types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Genre used when the caller gives none.
pub const DEFAULT_GENRE: &str = "inspirational";

/// Trimmed, lowercased genre requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Genre(String);

impl Genre {
    /// Normalize a raw `genre` parameter.
    ///
    /// Missing or blank input falls back to [`DEFAULT_GENRE`].
    pub fn normalize(raw: Option<&str>) -> Self {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            Self(DEFAULT_GENRE.to_string())
        } else {
            Self(trimmed.to_lowercase())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Genres served by the joke API instead of the quote API.
    pub fn is_humor(&self) -> bool {
        matches!(self.0.as_str(), "humor" | "fun")
    }
}

impl Default for Genre {
    fn default() -> Self {
        Self(DEFAULT_GENRE.to_string())
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A usable quote or joke: text and attribution, both non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quotation {
    text: String,
    author: String,
}

impl Quotation {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let author = author.into();
        if text.trim().is_empty() || author.trim().is_empty() {
            return None;
        }
        Some(Self { text, author })
    }
}

/// JSON body returned by `GET /get_quote`.
///
/// Built only through [`GatewayResponse::ok`] and [`GatewayResponse::failure`],
/// so `quote` and `author` are either both present and non-blank or both null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub success: bool,
    pub quote: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub message: String,
}

impl GatewayResponse {
    pub fn ok(quotation: Quotation, tags: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            quote: Some(quotation.text),
            author: Some(quotation.author),
            tags,
            message: message.into(),
        }
    }

    pub fn failure(tags: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            quote: None,
            author: None,
            tags,
            message: message.into(),
        }
    }
}

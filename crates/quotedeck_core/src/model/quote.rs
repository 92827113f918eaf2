//! Quote domain model.
//!
//! # Responsibility
//! - Define the record stored, exported and merged by the quote store.
//! - Gate the add path behind trim-and-validate construction.
//!
//! # Invariants
//! - `Quote::new` never yields an empty `text` or `category`.
//! - Deserialized quotes (import, remote sync) bypass content validation:
//!   the typed fields enforce shape, nothing more.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sentinel category selecting the whole collection.
pub const CATEGORY_ALL: &str = "all";

/// Validation failure on the add path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteValidationError {
    /// `text` was empty after trimming.
    EmptyText,
    /// `category` was empty after trimming.
    EmptyCategory,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text cannot be empty"),
            Self::EmptyCategory => write!(f, "quote category cannot be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

/// A stored quote.
///
/// There is no surrogate identifier: duplicate detection during merge uses
/// the exact `text` value, case- and whitespace-sensitive as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    /// Creates a quote from raw user input.
    ///
    /// Both fields are trimmed first; input that is empty after trimming is
    /// rejected and nothing is constructed.
    pub fn new(text: &str, category: &str) -> Result<Self, QuoteValidationError> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        if category.is_empty() {
            return Err(QuoteValidationError::EmptyCategory);
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }
}

/// Built-in starter quotes used when storage holds no collection yet.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote {
            text: "Believe you can and you're halfway there.".to_string(),
            category: "Motivation".to_string(),
        },
        Quote {
            text: "To be or not to be, that is the question.".to_string(),
            category: "Philosophy".to_string(),
        },
        Quote {
            text: "Life is what happens when you're busy making other plans.".to_string(),
            category: "Life".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{default_quotes, Quote, QuoteValidationError};

    #[test]
    fn new_trims_both_fields() {
        let quote = Quote::new("  stay hungry  ", "  Motivation ").unwrap();
        assert_eq!(quote.text, "stay hungry");
        assert_eq!(quote.category, "Motivation");
    }

    #[test]
    fn new_rejects_empty_text() {
        assert_eq!(
            Quote::new("   ", "Life").unwrap_err(),
            QuoteValidationError::EmptyText
        );
    }

    #[test]
    fn new_rejects_empty_category() {
        assert_eq!(
            Quote::new("something", "\t").unwrap_err(),
            QuoteValidationError::EmptyCategory
        );
    }

    #[test]
    fn defaults_cover_three_distinct_categories() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].category, "Motivation");
        assert_eq!(quotes[1].category, "Philosophy");
        assert_eq!(quotes[2].category, "Life");
    }
}

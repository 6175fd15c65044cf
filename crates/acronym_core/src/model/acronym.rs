//! Acronym record and input normalization.
//!
//! # Responsibility
//! - Define the persisted record shape.
//! - Own the single normalization rule used for writes and lookups.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of one definition row.
pub type AcronymId = i64;

/// One persisted `(term, expansion)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcronymRecord {
    pub id: AcronymId,
    /// Always uppercase.
    pub term: String,
    pub expansion: String,
    /// Unix epoch seconds at insertion.
    pub created_at: i64,
}

/// Validated input for a new record.
///
/// Construction goes through [`NewAcronym::parse`], so a value of this type
/// always carries a non-empty normalized term and expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAcronym {
    term: String,
    expansion: String,
}

impl NewAcronym {
    /// Normalizes raw user input, returning `None` when either side is blank.
    pub fn parse(term: &str, expansion: &str) -> Option<Self> {
        let term = normalize_term(term);
        let expansion = normalize_expansion(expansion);
        if term.is_empty() || expansion.is_empty() {
            return None;
        }
        Some(Self {
            term,
            expansion: expansion.to_string(),
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn expansion(&self) -> &str {
        &self.expansion
    }
}

/// Canonical lookup key: surrounding whitespace removed, uppercased.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_uppercase()
}

pub fn normalize_expansion(expansion: &str) -> &str {
    expansion.trim()
}

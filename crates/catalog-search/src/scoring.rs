//! Relevance scoring strategies.
//!
//! The two strategies produce scores on different scales and are never
//! mixed within one result set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Words dropped by term extraction for weighted scoring.
pub const STOP_WORDS: [&str; 12] = [
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Bonus when a term appears in the description.
const DESCRIPTION_BONUS: u32 = 2;
/// Bonus when a term appears in the manufacturer part number.
const PART_NUMBER_BONUS: u32 = 3;

/// How products are scored against a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    /// One point per query term found anywhere in the product's text fields.
    #[default]
    Substring,
    /// One point per matching term, plus bonuses for description and part
    /// number hits. Short tokens and stop words are ignored.
    Weighted,
}

impl ScoringStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringStrategy::Substring => "substring",
            ScoringStrategy::Weighted => "weighted",
        }
    }

    /// Split a query into the terms this strategy matches on.
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        let lowered = query.to_lowercase();
        match self {
            ScoringStrategy::Substring => lowered.split_whitespace().map(str::to_string).collect(),
            ScoringStrategy::Weighted => extract_terms(&lowered),
        }
    }

    /// Score one product against already-extracted terms.
    pub fn score(&self, terms: &[String], product: &Product) -> u32 {
        match self {
            ScoringStrategy::Substring => {
                let haystack = substring_haystack(product);
                terms
                    .iter()
                    .filter(|term| haystack.contains(term.as_str()))
                    .count() as u32
            }
            ScoringStrategy::Weighted => {
                let haystack = weighted_haystack(product);
                let description = product.description().to_lowercase();
                let part_no = product.mfg_part_no().to_lowercase();

                terms
                    .iter()
                    .filter(|term| haystack.contains(term.as_str()))
                    .map(|term| {
                        let mut score = 1;
                        if description.contains(term.as_str()) {
                            score += DESCRIPTION_BONUS;
                        }
                        if part_no.contains(term.as_str()) {
                            score += PART_NUMBER_BONUS;
                        }
                        score
                    })
                    .sum()
            }
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scoring strategy: {0} (expected substring or weighted)")]
pub struct UnknownStrategy(pub String);

impl FromStr for ScoringStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "substring" => Ok(ScoringStrategy::Substring),
            "weighted" => Ok(ScoringStrategy::Weighted),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Break text into index terms.
///
/// Splits on whitespace, drops tokens of two characters or fewer and stop
/// words, then strips everything but ASCII letters, digits and `_`. Tokens
/// that strip down to nothing are dropped.
pub fn extract_terms(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| token.chars().count() > 2 && !STOP_WORDS.contains(token))
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|term| !term.is_empty())
        .collect()
}

/// All searchable text fields, lowercased, empty ones skipped.
fn substring_haystack(product: &Product) -> String {
    [
        &product.description,
        &product.long_description,
        &product.mfg_part_no,
        &product.vendor_part_no,
        &product.vendor_name,
        &product.manufacturer_name,
        &product.customer_part_no,
        &product.classification_code,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .filter(|field| !field.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// The signal fields used by weighted scoring, lowercased.
fn weighted_haystack(product: &Product) -> String {
    [
        product.description(),
        product.mfg_part_no(),
        product.vendor_name(),
        product.manufacturer_name(),
    ]
    .join(" ")
    .to_lowercase()
}

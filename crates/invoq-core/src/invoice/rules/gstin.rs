//! GSTIN (Goods and Services Tax Identification Number) extraction.
//!
//! The 15-character pattern is matched as-is; no check-digit validation.

use super::FieldExtractor;
use super::patterns::GSTIN_PATTERN;

/// GSTIN field extractor.
pub struct GstinExtractor;

impl GstinExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GstinExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for GstinExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        GSTIN_PATTERN.find(text).map(|m| m.as_str().to_string())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        GSTIN_PATTERN
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Extract the first GSTIN-shaped token from text.
pub fn extract_gstin(text: &str) -> Option<String> {
    GstinExtractor::new().extract(text)
}

//! Rule-based field extractors for invoice text.

pub mod amounts;
pub mod dates;
pub mod gstin;
pub mod patterns;

pub use amounts::{AmountExtractor, find_labeled_amount, parse_amount};
pub use dates::{DateExtractor, normalize_date};
pub use gstin::{GstinExtractor, extract_gstin};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

//! Regex patterns for invoice field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // GSTIN (15-character Indian tax ID), pattern match only, no checksum
    pub static ref GSTIN_PATTERN: Regex = Regex::new(
        r"\b\d{2}[A-Z]{5}\d{4}[A-Z]\dZ\d\b"
    ).unwrap();

    // Labeled invoice number: "Invoice No: INV-2024-001", "invoice number ABC/1"
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)invoice\s*(?:no\.?|number)?[:\s]*([A-Z0-9\-/]+)"
    ).unwrap();

    // Numeric date: 15/03/2024, 15-3-24
    pub static ref DATE_PATTERN: Regex = Regex::new(
        r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}"
    ).unwrap();

    // Amount: 1,234.50 or 1234 or 1234.5
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"\d{1,3}(?:,\d{3})*(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?"
    ).unwrap();

    // Labels for the three monetary totals
    pub static ref SUBTOTAL_LABEL: Regex = Regex::new(
        r"(?i)sub\s*total"
    ).unwrap();

    pub static ref TAX_LABEL: Regex = Regex::new(
        r"(?i)tax|gst"
    ).unwrap();

    pub static ref TOTAL_LABEL: Regex = Regex::new(
        r"(?i)total|amount\s+due"
    ).unwrap();
}

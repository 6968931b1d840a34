//! Monetary amount extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use regex::Regex;

use super::FieldExtractor;
use super::patterns::AMOUNT_PATTERN;

/// Extractor for numeric amount tokens.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        AMOUNT_PATTERN.find(text).map(|m| parse_amount(m.as_str()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AMOUNT_PATTERN
            .find_iter(text)
            .map(|m| parse_amount(m.as_str()))
            .collect()
    }
}

/// Find the labeled amount for one target field.
///
/// Scans lines in order and returns the first numeric token on the first
/// label-matching line that carries one; label lines without a number (a
/// "TAX INVOICE" heading, say) are skipped. Scans are independent per field
/// and first-match-in-document-order: a line matching several label patterns
/// is taken by each of the corresponding scans.
pub fn find_labeled_amount(lines: &[&str], label: &Regex) -> Option<Decimal> {
    lines
        .iter()
        .filter(|line| label.is_match(line))
        .find_map(|line| AmountExtractor::new().extract(line))
}

/// Parse an amount token, stripping thousands separators.
pub fn parse_amount(value: &str) -> Decimal {
    let normalized = value.replace(',', "");
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::patterns::{SUBTOTAL_LABEL, TAX_LABEL, TOTAL_LABEL};
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_strips_thousands_separators() {
        assert_eq!(parse_amount("12,345.67"), dec("12345.67"));
        assert_eq!(parse_amount("1,234.50"), dec("1234.50"));
        assert_eq!(parse_amount("1234"), dec("1234"));
        assert_eq!(parse_amount("0.5"), dec("0.5"));
    }

    #[test]
    fn test_find_labeled_amount() {
        let lines = vec!["Acme Supplies", "Sub Total 1,234.50", "GST 180.00"];
        assert_eq!(
            find_labeled_amount(&lines, &SUBTOTAL_LABEL),
            Some(dec("1234.50"))
        );
        assert_eq!(find_labeled_amount(&lines, &TAX_LABEL), Some(dec("180.00")));
    }

    #[test]
    fn test_missing_label_yields_none() {
        let lines = vec!["Acme Supplies", "nothing to see"];
        assert_eq!(find_labeled_amount(&lines, &TOTAL_LABEL), None);
    }

    #[test]
    fn test_total_scan_takes_first_matching_line() {
        // "Sub Total" also matches the total label; document order wins.
        let lines = vec!["Sub Total 1,234.50", "Total 1,456.21"];
        assert_eq!(
            find_labeled_amount(&lines, &TOTAL_LABEL),
            Some(dec("1234.50"))
        );
    }

    #[test]
    fn test_label_line_without_number_is_skipped() {
        // A "TAX INVOICE" heading matches the tax label but carries no
        // amount; the scan must continue to the real tax line.
        let lines = vec!["TAX INVOICE", "Acme Supplies", "GST 180.00"];
        assert_eq!(find_labeled_amount(&lines, &TAX_LABEL), Some(dec("180.00")));
    }

    #[test]
    fn test_amount_due_label() {
        let lines = vec!["Amount Due 99.99"];
        assert_eq!(find_labeled_amount(&lines, &TOTAL_LABEL), Some(dec("99.99")));
    }

    #[test]
    fn test_extract_all_amounts() {
        let all = AmountExtractor::new().extract_all("Qty 2 at 100.00 each, 200.00 total");
        assert_eq!(all, vec![dec("2"), dec("100.00"), dec("200.00")]);
    }
}

//! Heuristic field parsing of recognized invoice text.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::models::invoice::{LineItem, ParsedInvoice};

use super::rules::{
    FieldExtractor,
    dates::{DateExtractor, normalize_date},
    gstin::extract_gstin,
    amounts::find_labeled_amount,
    patterns::{INVOICE_NUMBER, SUBTOTAL_LABEL, TAX_LABEL, TOTAL_LABEL},
};

/// Placeholder SKU for the synthetic line item.
const PLACEHOLDER_SKU: &str = "OCR-DETECTED";
const PLACEHOLDER_DESCRIPTION: &str = "Line items pending structured extraction";

/// Raw field candidates scanned from text, before defaulting.
///
/// Each field is scanned independently over the same trimmed, line-split
/// text; `None` means the pattern did not match anywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    pub supplier_name: Option<String>,
    pub supplier_gstin: Option<String>,
    pub invoice_no: Option<String>,
    pub invoice_date: Option<String>,
    pub subtotal: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
}

/// Rule-based parser turning recognized text into a [`ParsedInvoice`].
#[derive(Debug, Default)]
pub struct TextFieldParser;

impl TextFieldParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse text into a fully-normalized invoice record.
    pub fn parse(&self, text: &str) -> ParsedInvoice {
        self.scan(text).normalize()
    }

    /// Scan raw field candidates without applying defaults.
    pub fn scan(&self, text: &str) -> RawFields {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        RawFields {
            supplier_name: guess_supplier(&lines),
            supplier_gstin: extract_gstin(text),
            invoice_no: INVOICE_NUMBER
                .captures(text)
                .map(|caps| caps[1].to_string()),
            invoice_date: DateExtractor::new().extract(text),
            subtotal: find_labeled_amount(&lines, &SUBTOTAL_LABEL),
            tax: find_labeled_amount(&lines, &TAX_LABEL),
            total: find_labeled_amount(&lines, &TOTAL_LABEL),
        }
    }
}

impl RawFields {
    /// Apply defaulting rules and build the final record.
    ///
    /// Normalization is idempotent: feeding a normalized record's fields
    /// back through produces the same record.
    pub fn normalize(self) -> ParsedInvoice {
        let invoice_no = self.invoice_no.unwrap_or_else(auto_invoice_no);

        let invoice_date = self
            .invoice_date
            .as_deref()
            .and_then(normalize_date)
            .unwrap_or_else(|| Utc::now().date_naive());

        let subtotal = self.subtotal.unwrap_or(Decimal::ZERO).round_dp(2);
        let tax = self.tax.unwrap_or(Decimal::ZERO).round_dp(2);
        let total = self
            .total
            .unwrap_or_else(|| (subtotal + tax).max(Decimal::ZERO))
            .round_dp(2);

        let unit_price = if subtotal > Decimal::ZERO {
            subtotal
        } else {
            total
        };
        let tax_rate = if total == subtotal {
            Decimal::ZERO
        } else {
            (tax / subtotal.max(Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
        };

        ParsedInvoice {
            supplier_name: self.supplier_name,
            supplier_gstin: self.supplier_gstin,
            invoice_no,
            invoice_date,
            subtotal,
            tax,
            total,
            items: vec![LineItem {
                sku: PLACEHOLDER_SKU.to_string(),
                description: PLACEHOLDER_DESCRIPTION.to_string(),
                qty: Decimal::ONE,
                unit_price,
                tax_rate,
                line_total: total,
            }],
        }
    }
}

impl From<&ParsedInvoice> for RawFields {
    fn from(invoice: &ParsedInvoice) -> Self {
        Self {
            supplier_name: invoice.supplier_name.clone(),
            supplier_gstin: invoice.supplier_gstin.clone(),
            invoice_no: Some(invoice.invoice_no.clone()),
            invoice_date: Some(invoice.invoice_date.format("%Y-%m-%d").to_string()),
            subtotal: Some(invoice.subtotal),
            tax: Some(invoice.tax),
            total: Some(invoice.total),
        }
    }
}

/// Synthesize an invoice number from the current UTC time.
pub(crate) fn auto_invoice_no() -> String {
    format!("AUTO-{}", Utc::now().format("%Y%m%d%H%M%S"))
}

/// Guess the supplier name from the top of the document.
///
/// Looks at the first five non-empty lines, skips anything mentioning
/// "invoice", and takes the first line with an alphabetic character.
fn guess_supplier(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .take(5)
        .find(|line| {
            !line.to_lowercase().contains("invoice") && line.chars().any(|c| c.is_alphabetic())
        })
        .map(|line| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const SAMPLE: &str = "\
Acme Supplies
Invoice No: INV-2024-001
Date: 15/03/2024
Total 1,456.21
Sub Total 1,234.50
Tax 221.71";

    #[test]
    fn test_parse_sample_invoice() {
        let invoice = TextFieldParser::new().parse(SAMPLE);

        assert_eq!(invoice.supplier_name.as_deref(), Some("Acme Supplies"));
        assert_eq!(invoice.invoice_no, "INV-2024-001");
        assert_eq!(invoice.invoice_date.to_string(), "2024-03-15");
        assert_eq!(invoice.subtotal, dec("1234.50"));
        assert_eq!(invoice.tax, dec("221.71"));
        assert_eq!(invoice.total, dec("1456.21"));
    }

    #[test]
    fn test_placeholder_item_carries_document_totals() {
        let invoice = TextFieldParser::new().parse(SAMPLE);

        assert_eq!(invoice.items.len(), 1);
        let item = &invoice.items[0];
        assert_eq!(item.sku, "OCR-DETECTED");
        assert_eq!(item.qty, Decimal::ONE);
        assert_eq!(item.unit_price, dec("1234.50"));
        assert_eq!(item.tax_rate, dec("17.96"));
        assert_eq!(item.line_total, dec("1456.21"));
    }

    #[test]
    fn test_gstin_extraction() {
        let invoice = TextFieldParser::new().parse("Acme Supplies\n29ABCDE1234F1Z5\nTotal 100");
        assert_eq!(
            invoice.supplier_gstin.as_deref(),
            Some("29ABCDE1234F1Z5")
        );
    }

    #[test]
    fn test_gstin_line_is_picked_up_by_tax_scan() {
        // Independent per-field scans: the GSTIN label also matches the
        // tax label pattern, and its leading digits are the first token.
        let raw = TextFieldParser::new().scan("GSTIN: 29ABCDE1234F1Z5");
        assert_eq!(raw.tax, Some(dec("29")));
    }

    #[test]
    fn test_tax_invoice_heading_does_not_swallow_tax_scan() {
        let raw = TextFieldParser::new()
            .scan("TAX INVOICE\nAcme Supplies\nGST 180.00\nTotal 1180.00");
        assert_eq!(raw.tax, Some(dec("180.00")));
        assert_eq!(raw.total, Some(dec("1180.00")));
    }

    #[test]
    fn test_extracted_zero_total_is_kept() {
        // A matched "Total 0.00" is an extracted value, not a missing one;
        // it must not be replaced by subtotal + tax.
        let invoice = TextFieldParser::new().parse("Acme\nTotal 0.00\nTax 18.00");
        assert_eq!(invoice.tax, dec("18.00"));
        assert_eq!(invoice.total, dec("0.00"));
    }

    #[test]
    fn test_missing_invoice_no_is_synthesized() {
        let invoice = TextFieldParser::new().parse("Acme Supplies\nTotal 500.00");
        assert!(invoice.invoice_no.starts_with("AUTO-"));
        assert_eq!(invoice.invoice_no.len(), "AUTO-".len() + 14);
    }

    #[test]
    fn test_missing_date_defaults_to_today() {
        let invoice = TextFieldParser::new().parse("Acme Supplies\nTotal 500.00");
        assert_eq!(invoice.invoice_date, Utc::now().date_naive());
    }

    #[test]
    fn test_missing_total_defaults_to_subtotal_plus_tax() {
        let invoice = TextFieldParser::new().parse("Acme\nSub Total 100.00\nGST 18.00");
        assert_eq!(invoice.subtotal, dec("100.00"));
        assert_eq!(invoice.tax, dec("18.00"));
        // "Sub Total" matches the total label too, first match in order.
        assert_eq!(invoice.total, dec("100.00"));
    }

    #[test]
    fn test_missing_amounts_default_to_zero() {
        let invoice = TextFieldParser::new().parse("just some words");
        assert_eq!(invoice.subtotal, Decimal::ZERO);
        assert_eq!(invoice.tax, Decimal::ZERO);
        assert_eq!(invoice.total, Decimal::ZERO);
        assert_eq!(invoice.items.len(), 1);
    }

    #[test]
    fn test_supplier_guess_skips_invoice_lines() {
        let raw = TextFieldParser::new().scan("TAX INVOICE\n123456\nAcme Supplies\nTotal 1");
        assert_eq!(raw.supplier_name.as_deref(), Some("Acme Supplies"));
    }

    #[test]
    fn test_supplier_guess_only_considers_first_five_lines() {
        let raw = TextFieldParser::new().scan("1\n2\n3\n4\n5\nAcme Supplies");
        assert_eq!(raw.supplier_name, None);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = TextFieldParser::new().parse(SAMPLE);
        let second = RawFields::from(&first).normalize();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_all_fields_present_is_deterministic() {
        let raw = RawFields {
            supplier_name: Some("Acme".to_string()),
            supplier_gstin: None,
            invoice_no: Some("INV-1".to_string()),
            invoice_date: Some("2024-03-15".to_string()),
            subtotal: Some(dec("100")),
            tax: Some(dec("18")),
            total: Some(dec("118")),
        };
        assert_eq!(raw.clone().normalize(), raw.normalize());
    }

    #[test]
    fn test_zero_subtotal_prices_item_at_total() {
        let invoice = TextFieldParser::new().parse("Acme\nTotal 250.00");
        let item = &invoice.items[0];
        assert_eq!(item.unit_price, dec("250.00"));
        // subtotal 0 != total, so the rate is tax/max(subtotal,1)
        assert_eq!(item.tax_rate, Decimal::ZERO.round_dp(2));
    }
}

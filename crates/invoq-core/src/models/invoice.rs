//! The parsed invoice record produced by the extraction pipeline.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A structured invoice record extracted from a scanned document.
///
/// Every extraction call produces a fresh, fully-populated record: optional
/// fields may be `None`, but `invoice_no` is never empty, `invoice_date` is
/// always a valid calendar date, the three amounts are non-negative and
/// rounded to two decimal places, and `items` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedInvoice {
    /// Supplier name, best-effort guess from the top of the document.
    pub supplier_name: Option<String>,

    /// Supplier GSTIN (15-character tax ID), pattern-matched only.
    pub supplier_gstin: Option<String>,

    /// Invoice number; synthesized as `AUTO-<UTC timestamp>` when not found.
    pub invoice_no: String,

    /// Invoice date; serializes as an ISO-8601 calendar date.
    pub invoice_date: NaiveDate,

    /// Net amount before tax.
    pub subtotal: Decimal,

    /// Tax amount.
    pub tax: Decimal,

    /// Gross amount; defaults to `subtotal + tax` when not matched directly.
    pub total: Decimal,

    /// Line items; at least one entry, synthetic when not OCR-confirmed.
    pub items: Vec<LineItem>,
}

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product code.
    pub sku: String,

    /// Product/service description.
    pub description: String,

    /// Quantity.
    pub qty: Decimal,

    /// Unit price.
    pub unit_price: Decimal,

    /// Tax rate as a percentage (0-100 typical).
    pub tax_rate: Decimal,

    /// Total amount for this line.
    pub line_total: Decimal,
}

impl ParsedInvoice {
    /// Validate the record and return any consistency issues found.
    ///
    /// Issues are informational; the pipeline itself never rejects a record.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_no.is_empty() {
            issues.push("Missing invoice number".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.subtotal < Decimal::ZERO || self.tax < Decimal::ZERO || self.total < Decimal::ZERO
        {
            issues.push("Negative amount".to_string());
        }

        let computed = self.subtotal + self.tax;
        if (computed - self.total).abs() > Decimal::new(1, 2) {
            issues.push(format!(
                "Total ({}) differs from subtotal + tax ({})",
                self.total, computed
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(subtotal: &str, tax: &str, total: &str) -> ParsedInvoice {
        ParsedInvoice {
            supplier_name: Some("Acme Supplies".to_string()),
            supplier_gstin: None,
            invoice_no: "INV-1".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            subtotal: Decimal::from_str(subtotal).unwrap(),
            tax: Decimal::from_str(tax).unwrap(),
            total: Decimal::from_str(total).unwrap(),
            items: vec![LineItem {
                sku: "SKU-1".to_string(),
                description: "Item".to_string(),
                qty: Decimal::ONE,
                unit_price: Decimal::from_str(subtotal).unwrap(),
                tax_rate: Decimal::ZERO,
                line_total: Decimal::from_str(total).unwrap(),
            }],
        }
    }

    #[test]
    fn test_validate_consistent_record() {
        assert!(record("100.00", "18.00", "118.00").validate().is_empty());
    }

    #[test]
    fn test_validate_flags_total_mismatch() {
        let issues = record("100.00", "18.00", "150.00").validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("differs"));
    }

    #[test]
    fn test_validate_flags_empty_items() {
        let mut invoice = record("100.00", "18.00", "118.00");
        invoice.items.clear();
        assert!(invoice.validate().iter().any(|i| i.contains("line items")));
    }

    #[test]
    fn test_date_serializes_as_iso8601() {
        let invoice = record("100.00", "18.00", "118.00");
        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["invoice_date"], "2024-03-15");
    }
}

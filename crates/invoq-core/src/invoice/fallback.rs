//! Deterministic demo record used when no text can be recovered.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::models::invoice::{LineItem, ParsedInvoice};

use super::parser::auto_invoice_no;

/// Build the fallback invoice record.
///
/// Returned whenever the pipeline cannot recover any text from the input.
/// The shape is fixed so downstream consumers always see a well-formed
/// record; only the invoice number and date vary with the clock.
pub fn fallback_invoice() -> ParsedInvoice {
    ParsedInvoice {
        supplier_name: Some("Acme Supplies".to_string()),
        supplier_gstin: Some("29ABCDE1234F1Z5".to_string()),
        invoice_no: auto_invoice_no(),
        invoice_date: Utc::now().date_naive(),
        subtotal: Decimal::new(100_000, 2),
        tax: Decimal::new(18_000, 2),
        total: Decimal::new(118_000, 2),
        items: vec![LineItem {
            sku: "SKU-DEMO".to_string(),
            description: "Demo Item".to_string(),
            qty: Decimal::from(10),
            unit_price: Decimal::new(10_000, 2),
            tax_rate: Decimal::new(1_800, 2),
            line_total: Decimal::new(118_000, 2),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_fallback_shape() {
        let invoice = fallback_invoice();

        assert_eq!(invoice.supplier_name.as_deref(), Some("Acme Supplies"));
        assert_eq!(invoice.supplier_gstin.as_deref(), Some("29ABCDE1234F1Z5"));
        assert_eq!(invoice.subtotal, dec("1000.00"));
        assert_eq!(invoice.tax, dec("180.00"));
        assert_eq!(invoice.total, dec("1180.00"));
    }

    #[test]
    fn test_fallback_line_item() {
        let invoice = fallback_invoice();

        assert_eq!(invoice.items.len(), 1);
        let item = &invoice.items[0];
        assert_eq!(item.sku, "SKU-DEMO");
        assert_eq!(item.qty, dec("10"));
        assert_eq!(item.unit_price, dec("100.00"));
        assert_eq!(item.tax_rate, dec("18.00"));
        assert_eq!(item.line_total, dec("1180.00"));
    }

    #[test]
    fn test_fallback_invoice_no_is_time_stamped() {
        let invoice = fallback_invoice();
        assert!(invoice.invoice_no.starts_with("AUTO-"));
        assert!(invoice.invoice_no[5..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_fallback_is_internally_consistent() {
        let invoice = fallback_invoice();
        assert_eq!(invoice.subtotal + invoice.tax, invoice.total);
        assert!(invoice.validate().is_empty());
    }
}

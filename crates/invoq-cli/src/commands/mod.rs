//! Command implementations.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;

use invoq_core::ParsedInvoice;
use invoq_core::models::config::InvoqConfig;

/// Output format shared by the extract and batch commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Load configuration from an explicit path, or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvoqConfig> {
    match config_path {
        Some(path) => Ok(InvoqConfig::from_file(Path::new(path))?),
        None => Ok(InvoqConfig::default()),
    }
}

/// Infer the content type passed to the pipeline from the file extension.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("pdf") => Some("application/pdf"),
        Some("png") => Some("image/png"),
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        Some("tif") | Some("tiff") => Some("image/tiff"),
        Some("bmp") => Some("image/bmp"),
        Some("webp") => Some("image/webp"),
        _ => None,
    }
}

pub fn format_invoice(invoice: &ParsedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &ParsedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_no",
        "invoice_date",
        "supplier_name",
        "supplier_gstin",
        "subtotal",
        "tax",
        "total",
    ])?;

    wtr.write_record([
        &invoice.invoice_no,
        &invoice.invoice_date.to_string(),
        &invoice.supplier_name.clone().unwrap_or_default(),
        &invoice.supplier_gstin.clone().unwrap_or_default(),
        &invoice.subtotal.to_string(),
        &invoice.tax.to_string(),
        &invoice.total.to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &ParsedInvoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", invoice.invoice_no));
    output.push_str(&format!("Date: {}\n", invoice.invoice_date));
    output.push('\n');

    output.push_str("Supplier:\n");
    output.push_str(&format!(
        "  {}\n",
        invoice.supplier_name.as_deref().unwrap_or("(unknown)")
    ));
    if let Some(gstin) = &invoice.supplier_gstin {
        output.push_str(&format!("  GSTIN: {}\n", gstin));
    }
    output.push('\n');

    output.push_str("Summary:\n");
    output.push_str(&format!("  Subtotal: {}\n", invoice.subtotal));
    output.push_str(&format!("  Tax:      {}\n", invoice.tax));
    output.push_str(&format!("  Total:    {}\n", invoice.total));

    output.push('\n');
    output.push_str("Items:\n");
    for item in &invoice.items {
        output.push_str(&format!(
            "  {} x{} @ {} = {}\n",
            item.sku, item.qty, item.unit_price, item.line_total
        ));
    }

    output
}

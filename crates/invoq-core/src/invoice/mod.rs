//! Invoice extraction pipeline.
//!
//! [`InvoiceExtractor`] wires together decoding, text recognition and field
//! parsing. The pipeline is total: every input, however malformed, yields a
//! well-formed [`ParsedInvoice`](crate::models::invoice::ParsedInvoice).

mod fallback;
mod parser;
pub mod rules;

pub use fallback::fallback_invoice;
pub use parser::{RawFields, TextFieldParser};

use tracing::debug;

use crate::loader::ImageLoader;
use crate::models::config::InvoqConfig;
use crate::models::invoice::ParsedInvoice;
use crate::ocr::RecognitionPort;

/// End-to-end extractor from document bytes to an invoice record.
pub struct InvoiceExtractor {
    config: InvoqConfig,
    loader: ImageLoader,
    recognizer: RecognitionPort,
    parser: TextFieldParser,
}

impl InvoiceExtractor {
    /// Build an extractor, initializing the recognition engine once.
    ///
    /// A recognition engine that fails to load leaves the extractor fully
    /// functional with recognition permanently disabled.
    pub fn new(config: InvoqConfig) -> Self {
        let recognizer = RecognitionPort::initialize(&config.ocr);
        Self {
            config,
            loader: ImageLoader::new(),
            recognizer,
            parser: TextFieldParser::new(),
        }
    }

    /// Build an extractor around an already-constructed recognition port.
    pub fn with_recognizer(config: InvoqConfig, recognizer: RecognitionPort) -> Self {
        Self {
            config,
            loader: ImageLoader::new(),
            recognizer,
            parser: TextFieldParser::new(),
        }
    }

    /// Whether text recognition is available.
    pub fn recognition_ready(&self) -> bool {
        self.recognizer.ready()
    }

    /// Extract an invoice record from raw document bytes.
    ///
    /// Never fails: if no text can be recovered (undecodable bytes, missing
    /// recognition engine, blank document) the deterministic fallback record
    /// is returned instead.
    pub fn extract(&self, bytes: &[u8], content_type: Option<&str>) -> ParsedInvoice {
        let text = self.recover_text(bytes, content_type);
        if text.trim().is_empty() {
            debug!("no text recovered, synthesizing fallback record");
            return fallback_invoice();
        }

        debug!(chars = text.len(), "parsing recovered text");
        self.parser.parse(&text)
    }

    /// Recover raw text from the input, or "" when nothing is usable.
    ///
    /// PDFs with enough embedded text skip rasterization and OCR entirely.
    fn recover_text(&self, bytes: &[u8], content_type: Option<&str>) -> String {
        #[cfg(feature = "pdf")]
        if content_type.is_some_and(|ct| ct.contains("pdf")) && self.config.pdf.prefer_embedded_text
        {
            match crate::pdf::extract_text(bytes) {
                Ok(text) if text.trim().len() >= self.config.pdf.min_text_length => {
                    debug!(chars = text.len(), "using embedded PDF text");
                    return text;
                }
                Ok(_) => debug!("embedded PDF text too short, trying OCR"),
                Err(e) => debug!("embedded text extraction failed: {}", e),
            }
        }

        match self.loader.load(bytes, content_type) {
            Some(bitmap) => self.recognizer.extract_text(&bitmap),
            None => String::new(),
        }
    }
}

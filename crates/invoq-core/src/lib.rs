//! Core library for invoice OCR processing.
//!
//! This crate provides:
//! - Image and first-page PDF loading
//! - Text recognition behind an optional-capability port
//! - Heuristic invoice field extraction (supplier, GSTIN, number, date, amounts)
//! - A deterministic fallback record when no usable text exists
//!
//! The single entry point is [`InvoiceExtractor::extract`], which always
//! returns a well-formed [`ParsedInvoice`] regardless of input.

pub mod error;
pub mod invoice;
pub mod loader;
pub mod models;
pub mod ocr;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use error::{InvoqError, Result};
pub use invoice::{InvoiceExtractor, TextFieldParser, fallback_invoice};
pub use loader::ImageLoader;
pub use models::invoice::{LineItem, ParsedInvoice};
pub use ocr::{RecognitionPort, TextRecognition};

#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;

//! Text recognition behind an optional-capability port.
//!
//! The heavy recognition engine is wrapped in [`RecognitionPort`], which is
//! constructed exactly once per process. If the engine cannot be initialized
//! the port stays permanently not-ready and yields empty text, so the rest
//! of the pipeline degrades instead of failing.

#[cfg(feature = "native")]
mod engine;

#[cfg(feature = "native")]
pub use engine::PureOcrEngine;

use image::DynamicImage;
use tracing::warn;

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// A backend that turns a bitmap into recognized text lines.
///
/// Implementations are used read-only after construction. Concurrent
/// invocation is safe if and only if the underlying engine is thread-safe
/// for inference; that guarantee belongs to the engine integration, not to
/// this trait.
pub trait TextRecognition: Send + Sync {
    /// Recognize text in the image, one entry per line group in reading order.
    fn recognize_lines(&self, image: &DynamicImage) -> Result<Vec<String>, OcrError>;
}

/// Process-wide handle to the recognition capability.
pub struct RecognitionPort {
    backend: Option<Box<dyn TextRecognition>>,
}

impl RecognitionPort {
    /// Create a port with no backend; `extract_text` always yields "".
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Create a port around an already-constructed backend.
    pub fn with_backend(backend: Box<dyn TextRecognition>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Initialize the bundled engine from configured model files.
    ///
    /// Attempted once; a load failure is logged and leaves the port
    /// not-ready for the lifetime of the process.
    #[cfg(feature = "native")]
    pub fn initialize(config: &OcrConfig) -> Self {
        match PureOcrEngine::from_config(config) {
            Ok(engine) => {
                tracing::info!("recognition engine initialized");
                Self::with_backend(Box::new(engine))
            }
            Err(e) => {
                warn!("failed to initialize recognition engine: {}", e);
                Self::disabled()
            }
        }
    }

    #[cfg(not(feature = "native"))]
    pub fn initialize(_config: &OcrConfig) -> Self {
        warn!("built without the native OCR feature, recognition disabled");
        Self::disabled()
    }

    /// Whether a recognition backend is available.
    pub fn ready(&self) -> bool {
        self.backend.is_some()
    }

    /// Recognize text in the image; never fails.
    ///
    /// Returns the recognized lines joined with newlines, or the empty
    /// string when the port is not ready or inference fails. An inference
    /// failure affects only that call; the port stays ready.
    pub fn extract_text(&self, image: &DynamicImage) -> String {
        let Some(backend) = &self.backend else {
            return String::new();
        };

        match backend.recognize_lines(image) {
            Ok(lines) => lines.join("\n"),
            Err(e) => {
                warn!("recognition inference failed: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLines(Vec<String>);

    impl TextRecognition for FixedLines {
        fn recognize_lines(&self, _image: &DynamicImage) -> Result<Vec<String>, OcrError> {
            Ok(self.0.clone())
        }
    }

    struct AlwaysFails;

    impl TextRecognition for AlwaysFails {
        fn recognize_lines(&self, _image: &DynamicImage) -> Result<Vec<String>, OcrError> {
            Err(OcrError::Recognition("boom".to_string()))
        }
    }

    fn blank_image() -> DynamicImage {
        DynamicImage::new_rgb8(4, 4)
    }

    #[test]
    fn test_disabled_port_yields_empty_text() {
        let port = RecognitionPort::disabled();
        assert!(!port.ready());
        assert_eq!(port.extract_text(&blank_image()), "");
    }

    #[test]
    fn test_ready_port_joins_lines() {
        let port = RecognitionPort::with_backend(Box::new(FixedLines(vec![
            "Acme Supplies".to_string(),
            "Total 118.00".to_string(),
        ])));
        assert!(port.ready());
        assert_eq!(
            port.extract_text(&blank_image()),
            "Acme Supplies\nTotal 118.00"
        );
    }

    #[test]
    fn test_inference_failure_yields_empty_text_and_stays_ready() {
        let port = RecognitionPort::with_backend(Box::new(AlwaysFails));
        assert_eq!(port.extract_text(&blank_image()), "");
        assert!(port.ready());
    }

    #[test]
    fn test_initialize_with_missing_models_is_not_ready() {
        let config = OcrConfig {
            model_dir: std::path::PathBuf::from("/nonexistent/models"),
            ..OcrConfig::default()
        };
        let port = RecognitionPort::initialize(&config);
        assert!(!port.ready());
    }
}

//! Recognition backend using `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::TextRecognition;

/// OCR engine backed by `pure-onnx-ocr`.
///
/// The inner engine caches model plans in `RefCell`s and is not `Sync`;
/// a mutex serializes access so this type satisfies `TextRecognition`.
pub struct PureOcrEngine {
    engine: std::sync::Mutex<pure_onnx_ocr::engine::OcrEngine>,
}

// SAFETY: `OcrEngine` is not `Send`/`Sync` only because its inference sessions
// cache compiled model plans in `RefCell`s behind `Arc`s. All of those `Arc`
// handles are owned by the single `OcrEngine` value held here; the library
// spawns no threads and we never expose the inner engine, so the mutex
// serializes every access to the caches.
unsafe impl Send for PureOcrEngine {}
unsafe impl Sync for PureOcrEngine {}

impl PureOcrEngine {
    /// Create an engine from the configured model files.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_dir.join(&config.detection_model);
        let rec_path = config.model_dir.join(&config.recognition_model);
        let dict_path = config.model_dir.join(&config.dictionary);

        if !det_path.exists() || !rec_path.exists() {
            return Err(OcrError::ModelLoad(format!(
                "model files not found in {}",
                config.model_dir.display()
            )));
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!(
            "loaded pure-onnx-ocr engine from {}",
            config.model_dir.display()
        );

        Ok(Self {
            engine: std::sync::Mutex::new(engine),
        })
    }
}

impl TextRecognition for PureOcrEngine {
    fn recognize_lines(&self, image: &DynamicImage) -> Result<Vec<String>, OcrError> {
        let results = self
            .engine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut regions: Vec<(f32, f32, String)> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                (x, y, r.text.replace("[UNK]", " "))
            })
            .collect();

        // Reading order: group rows by approximate Y, left-to-right within a row.
        regions.sort_by(|a, b| {
            let row_a = (a.1 / 20.0) as i32;
            let row_b = (b.1 / 20.0) as i32;
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        Ok(regions.into_iter().map(|(_, _, text)| text).collect())
    }
}

fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    for coord in polygon.exterior().coords() {
        min_x = min_x.min(coord.x as f32);
        min_y = min_y.min(coord.y as f32);
    }
    (min_x, min_y)
}

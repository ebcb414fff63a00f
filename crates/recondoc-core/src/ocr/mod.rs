//! OCR fallback engine wrapping `pure-onnx-ocr` (pure Rust, no external
//! ONNX Runtime).

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// OCR engine used when a PDF carries no extractable embedded text.
pub struct OcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

impl OcrEngine {
    /// Create an engine from model files in a directory.
    pub fn from_dir(model_dir: &Path, config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = model_dir.join(&config.detection_model);
        let rec_path = model_dir.join(&config.recognition_model);
        let dict_path = model_dir.join(&config.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self { engine })
    }

    /// Create an engine from the model directory named in the configuration.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        Self::from_dir(&config.model_dir, config)
    }

    /// Recognize text in a page image.
    ///
    /// Detected regions are reassembled in reading order (top-to-bottom,
    /// left-to-right) before joining, so label patterns like "Vendor: ..."
    /// survive region-level detection.
    pub fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let mut regions: Vec<(f32, f32, String)> = results
            .iter()
            .map(|r| {
                let (x, y) = region_origin(&r.bounding_box);
                (x, y, r.text.clone())
            })
            .collect();

        // Group into rows of ~20px, then left to right within a row.
        regions.sort_by(|a, b| {
            let row_a = (a.1 / 20.0) as i32;
            let row_b = (b.1 / 20.0) as i32;
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let text = regions
            .iter()
            .map(|(_, _, t)| t.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            "OCR recognized {} regions in {}ms",
            regions.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Top-left corner of a detected region polygon.
fn region_origin(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    for coord in polygon.exterior().coords() {
        min_x = min_x.min(coord.x as f32);
        min_y = min_y.min(coord.y as f32);
    }
    (min_x, min_y)
}

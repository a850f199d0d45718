use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::engine::OcrEngine;

/// Result of one dispatch, successful or not. Failed outcomes are never
/// persisted by callers.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub text: String,
    /// 0-100 scale.
    pub confidence: f64,
    /// Formatted duration, e.g. `"0.42s"`.
    pub processing_time: String,
    pub language: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Confidence reported with the placeholder payload.
const PLACEHOLDER_CONFIDENCE: f64 = 85.5;

/// Routes a request to the first available engine, or degrades to a fixed
/// placeholder response when none is usable. One attempt per request: an
/// engine that was selected and then failed is not retried and no other
/// engine is consulted.
#[derive(Clone)]
pub struct OcrDispatcher {
    engines: Vec<Arc<dyn OcrEngine>>,
}

impl OcrDispatcher {
    pub fn new(engines: Vec<Arc<dyn OcrEngine>>) -> Self {
        Self { engines }
    }

    /// Current availability of every configured engine, in priority order.
    pub async fn engine_status(&self) -> Vec<(&'static str, bool)> {
        let mut status = Vec::with_capacity(self.engines.len());
        for engine in &self.engines {
            status.push((engine.name(), engine.is_available().await));
        }
        status
    }

    pub async fn dispatch(&self, image: &[u8], language: &str) -> ExtractionOutcome {
        let start = Instant::now();

        for engine in &self.engines {
            if !engine.is_available().await {
                debug!(engine = engine.name(), "Engine unavailable, trying next");
                continue;
            }

            return match engine.recognize(image, language).await {
                Ok(output) => {
                    info!(
                        engine = engine.name(),
                        confidence = output.confidence,
                        "Text recognized"
                    );
                    ExtractionOutcome {
                        text: output.text,
                        confidence: output.confidence,
                        processing_time: format_elapsed(start),
                        language: language.to_string(),
                        success: true,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(engine = engine.name(), error = %e, "Recognition failed");
                    ExtractionOutcome {
                        text: String::new(),
                        confidence: 0.0,
                        processing_time: format_elapsed(start),
                        language: language.to_string(),
                        success: false,
                        error: Some(e.to_string()),
                    }
                }
            };
        }

        // No engine is a non-error on purpose; callers persist this outcome
        // like any other success.
        info!("No OCR engine available, returning placeholder response");
        ExtractionOutcome {
            text: placeholder_text(language, image.len()),
            confidence: PLACEHOLDER_CONFIDENCE,
            processing_time: format_elapsed(start),
            language: language.to_string(),
            success: true,
            error: None,
        }
    }
}

fn format_elapsed(start: Instant) -> String {
    format!("{:.2}s", start.elapsed().as_secs_f64())
}

fn placeholder_text(language: &str, image_size: usize) -> String {
    format!(
        "No OCR engine is available on this server.\n\n\
         This placeholder stands in for the extracted text so the rest of \
         the application keeps working.\n\n\
         Language: {language}\n\
         Image size: {image_size} bytes\n\n\
         To enable real text extraction, install either:\n\
         - Tesseract: apt-get install tesseract-ocr (plus language packs)\n\
         - PaddleOCR: place the det/cls/rec ONNX models in OCR_MODEL_DIR\n\n\
         Upload, history, download, and deletion all work normally."
    )
}

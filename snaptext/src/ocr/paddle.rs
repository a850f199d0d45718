//! PaddleOCR fallback engine via ONNX Runtime.
//!
//! Model loading and session setup are expensive, so initialization happens
//! exactly once at construction; a failure is logged and remembered for the
//! process lifetime instead of being retried per request.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use paddle_ocr_rs::ocr_lite::OcrLite;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, SnaptextError};

use super::engine::{EngineOutput, OcrEngine};

const DET_MODEL_NAME: &str = "ch_PP-OCRv4_det_infer.onnx";
const REC_MODEL_NAME: &str = "ch_PP-OCRv4_rec_infer.onnx";
const CLS_MODEL_NAME: &str = "ch_ppocr_mobile_v2.0_cls_infer.onnx";

/// Text blocks at or below this score are discarded.
const MIN_SPAN_SCORE: f32 = 0.3;

enum PaddleState {
    Ready { engine: Arc<Mutex<OcrLite>> },
    Unavailable { reason: String },
}

pub struct PaddleEngine {
    state: PaddleState,
}

impl PaddleEngine {
    pub fn new(config: &OcrConfig) -> Self {
        let state = match Self::init(config) {
            Ok(engine) => {
                info!(model_dir = %config.model_dir, "PaddleOCR engine initialized");
                PaddleState::Ready {
                    engine: Arc::new(Mutex::new(engine)),
                }
            }
            Err(reason) => {
                warn!("PaddleOCR unavailable: {reason}");
                PaddleState::Unavailable { reason }
            }
        };

        Self { state }
    }

    fn init(config: &OcrConfig) -> std::result::Result<OcrLite, String> {
        let model_dir = Path::new(&config.model_dir);
        let det_model = model_dir.join(DET_MODEL_NAME);
        let cls_model = model_dir.join(CLS_MODEL_NAME);
        let rec_model = model_dir.join(REC_MODEL_NAME);

        for model in [&det_model, &cls_model, &rec_model] {
            if !model.exists() {
                return Err(format!(
                    "model file {} not found (set OCR_MODEL_DIR to a directory holding the \
                     PaddleOCR det/cls/rec ONNX models)",
                    model.display()
                ));
            }
        }

        let mut engine = OcrLite::new();
        engine
            .init_models(
                &det_model.to_string_lossy(),
                &cls_model.to_string_lossy(),
                &rec_model.to_string_lossy(),
                config.threads as usize,
            )
            .map_err(|e| format!("failed to init PaddleOCR: {e}"))?;

        Ok(engine)
    }
}

/// Drop low-score spans, join the survivors with newlines in engine order,
/// and average the kept scores onto a 0-100 scale.
fn collapse_spans(spans: &[(String, f32)]) -> (String, f64) {
    let kept: Vec<&(String, f32)> = spans
        .iter()
        .filter(|(_, score)| *score > MIN_SPAN_SCORE)
        .collect();

    if kept.is_empty() {
        return (String::new(), 0.0);
    }

    let text = kept
        .iter()
        .map(|(text, _)| text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let mean = kept
        .iter()
        .map(|(_, score)| *score as f64 * 100.0)
        .sum::<f64>()
        / kept.len() as f64;

    (text.trim().to_string(), (mean * 100.0).round() / 100.0)
}

#[async_trait]
impl OcrEngine for PaddleEngine {
    fn name(&self) -> &'static str {
        "paddle"
    }

    async fn is_available(&self) -> bool {
        matches!(self.state, PaddleState::Ready { .. })
    }

    async fn recognize(&self, image: &[u8], _language: &str) -> Result<EngineOutput> {
        let engine = match &self.state {
            PaddleState::Ready { engine } => Arc::clone(engine),
            PaddleState::Unavailable { reason } => {
                return Err(SnaptextError::EngineUnavailable(reason.clone()));
            }
        };

        let bytes = image.to_vec();

        let (text, confidence) = tokio::task::spawn_blocking(move || {
            let img = image::load_from_memory(&bytes)
                .map_err(|e| SnaptextError::Engine(format!("Failed to decode image: {e}")))?;
            let rgb = img.to_rgb8();

            let mut ocr = engine.blocking_lock();
            let result = ocr
                .detect(&rgb, 50, 1024, 0.5, 0.3, 1.6, false, false)
                .map_err(|e| SnaptextError::Engine(format!("PaddleOCR detection failed: {e}")))?;

            let spans: Vec<(String, f32)> = result
                .text_blocks
                .iter()
                .map(|block| (block.text.clone(), block.text_score))
                .collect();

            Ok::<_, SnaptextError>(collapse_spans(&spans))
        })
        .await
        .map_err(|e| SnaptextError::Engine(format!("OCR task panicked: {e}")))??;

        Ok(EngineOutput { text, confidence })
    }
}

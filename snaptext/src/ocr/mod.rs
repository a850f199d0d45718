//! OCR (Optical Character Recognition) Module
//!
//! Text recognition is delegated entirely to external engines; this module
//! owns input validation, engine selection, and result shaping.
//!
//! # Architecture
//!
//! - [`OcrEngine`] is the single capability every engine implements
//! - [`TesseractEngine`] shells out to the system `tesseract` binary
//! - [`PaddleEngine`] runs a CNN recognizer in-process via ONNX Runtime
//! - [`OcrDispatcher`] holds the engines in priority order and falls back
//!   to a fixed placeholder response when none is usable
//!
//! Engine availability differs on purpose: the Tesseract binary is probed
//! on every request (it can be installed or removed while the server runs),
//! while Paddle model loading is attempted once at startup and the outcome
//! is kept for the process lifetime.

mod dispatcher;
mod engine;
mod languages;
mod paddle;
mod tesseract;
mod validate;

pub use dispatcher::{ExtractionOutcome, OcrDispatcher};
pub use engine::{EngineOutput, OcrEngine};
pub use languages::supported_languages;
pub use paddle::PaddleEngine;
pub use tesseract::TesseractEngine;
pub use validate::{validate_image, ImageDetails, MAX_IMAGE_BYTES, MIN_DIMENSION_PX};

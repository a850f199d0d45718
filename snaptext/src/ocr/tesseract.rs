//! Tesseract engine driving the system `tesseract` binary.
//!
//! The binary is probed with a version query on every request rather than
//! once at startup: it can be installed or removed while the server runs.

use std::process::Command;

use async_trait::async_trait;
use image::ImageFormat;
use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, SnaptextError};

use super::engine::{EngineOutput, OcrEngine};

/// Fixed layout-analysis parameters: default OCR engine mode, assume a
/// single uniform block of text.
const OEM: &str = "3";
const PSM: &str = "6";

pub struct TesseractEngine {
    cmd: String,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Self {
        match which::which(&config.tesseract_cmd) {
            Ok(path) => info!(path = %path.display(), "Tesseract binary found"),
            Err(_) => warn!(
                cmd = %config.tesseract_cmd,
                "Tesseract binary not found on PATH - install tesseract-ocr \
                 (plus language packs) to enable the primary OCR engine"
            ),
        }

        Self {
            cmd: config.tesseract_cmd.clone(),
        }
    }

    fn probe(cmd: &str) -> bool {
        Command::new(cmd)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

/// Extract stdout on success or map the failure, marking a missing binary
/// as unavailability rather than an engine fault.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    error_prefix: &str,
) -> Result<String> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(SnaptextError::Engine(format!("{error_prefix}: {stderr}")))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SnaptextError::EngineUnavailable(
            "tesseract not found (install tesseract-ocr)".to_string(),
        )),
        Err(e) => Err(SnaptextError::Io(e)),
    }
}

/// Mean of all word confidences strictly greater than zero, 0.0 when there
/// are none. Tesseract's TSV output uses -1 for non-word rows.
fn parse_tsv_confidence(tsv: &str) -> f64 {
    let confidences: Vec<f64> = tsv
        .lines()
        .skip(1)
        .filter_map(|line| line.split('\t').nth(10))
        .filter_map(|conf| conf.trim().parse::<f64>().ok())
        .filter(|conf| *conf > 0.0)
        .collect();

    if confidences.is_empty() {
        return 0.0;
    }

    let mean = confidences.iter().sum::<f64>() / confidences.len() as f64;
    (mean * 100.0).round() / 100.0
}

fn run_tesseract(cmd: &str, image: &[u8], language: &str) -> Result<EngineOutput> {
    let img = image::load_from_memory(image)
        .map_err(|e| SnaptextError::Engine(format!("Failed to decode image: {e}")))?;
    let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());

    let input = tempfile::Builder::new()
        .prefix("snaptext-ocr-")
        .suffix(".png")
        .tempfile()?;
    rgb.save_with_format(input.path(), ImageFormat::Png)
        .map_err(|e| SnaptextError::Engine(format!("Failed to write engine input: {e}")))?;

    let text_output = Command::new(cmd)
        .arg(input.path())
        .arg("stdout")
        .args(["-l", language, "--oem", OEM, "--psm", PSM])
        .output();
    let text = handle_cmd_output(text_output, "tesseract failed")?;

    // A second pass for word confidences; a failure here is tolerated and
    // only zeroes the confidence, the extracted text still stands.
    let tsv_output = Command::new(cmd)
        .arg(input.path())
        .arg("stdout")
        .args(["-l", language, "--oem", OEM, "--psm", PSM, "tsv"])
        .output();
    let confidence = match handle_cmd_output(tsv_output, "tesseract tsv failed") {
        Ok(tsv) => parse_tsv_confidence(&tsv),
        Err(e) => {
            debug!(error = %e, "Confidence pass failed, reporting 0");
            0.0
        }
    };

    Ok(EngineOutput {
        text: text.trim().to_string(),
        confidence,
    })
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        let cmd = self.cmd.clone();
        tokio::task::spawn_blocking(move || Self::probe(&cmd))
            .await
            .unwrap_or(false)
    }

    async fn recognize(&self, image: &[u8], language: &str) -> Result<EngineOutput> {
        let cmd = self.cmd.clone();
        let bytes = image.to_vec();
        let language = language.to_string();

        tokio::task::spawn_blocking(move || run_tesseract(&cmd, &bytes, &language))
            .await
            .map_err(|e| SnaptextError::Engine(format!("OCR task panicked: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV_HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn tsv_confidence_averages_positive_values() {
        let tsv = format!(
            "{TSV_HEADER}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t\n\
             5\t1\t1\t1\t1\t1\t5\t5\t40\t10\t91.5\thello\n\
             5\t1\t1\t1\t1\t2\t50\t5\t40\t10\t88.5\tworld"
        );
        let confidence = parse_tsv_confidence(&tsv);
        assert!((confidence - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tsv_confidence_ignores_zero_and_negative() {
        let tsv = format!(
            "{TSV_HEADER}\n\
             5\t1\t1\t1\t1\t1\t5\t5\t40\t10\t0\tnoise\n\
             5\t1\t1\t1\t1\t2\t50\t5\t40\t10\t-1\t"
        );
        assert_eq!(parse_tsv_confidence(&tsv), 0.0);
    }

    #[test]
    fn tsv_confidence_empty_input_is_zero() {
        assert_eq!(parse_tsv_confidence(""), 0.0);
        assert_eq!(parse_tsv_confidence(TSV_HEADER), 0.0);
    }

    #[test]
    fn tsv_confidence_rounds_to_two_decimals() {
        let tsv = format!(
            "{TSV_HEADER}\n\
             5\t1\t1\t1\t1\t1\t5\t5\t40\t10\t33.333333\ta\n\
             5\t1\t1\t1\t1\t2\t50\t5\t40\t10\t33.333333\tb\n\
             5\t1\t1\t1\t1\t3\t95\t5\t40\t10\t33.333333\tc"
        );
        assert_eq!(parse_tsv_confidence(&tsv), 33.33);
    }

    #[test]
    fn missing_binary_maps_to_unavailable() {
        let result = handle_cmd_output(
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "enoent")),
            "tesseract failed",
        );
        assert!(matches!(result, Err(SnaptextError::EngineUnavailable(_))));
    }

    #[test]
    fn probe_reports_missing_binary() {
        assert!(!TesseractEngine::probe("definitely-not-a-real-binary-42"));
    }
}

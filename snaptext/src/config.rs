use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// OCR engine configuration.
///
/// The Tesseract binary is resolved from `PATH` unless `TESSERACT_CMD`
/// points somewhere else. `OCR_MODEL_DIR` must contain the PaddleOCR
/// det/cls/rec ONNX files for the fallback engine to initialize.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub default_language: String,
    pub tesseract_cmd: String,
    pub model_dir: String,
    pub threads: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SNAPTEXT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("SNAPTEXT_PORT", 8000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:snaptext.db".to_string()),
            },
            ocr: OcrConfig {
                default_language: env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string()),
                tesseract_cmd: env::var("TESSERACT_CMD")
                    .unwrap_or_else(|_| "tesseract".to_string()),
                model_dir: env::var("OCR_MODEL_DIR")
                    .unwrap_or_else(|_| "models/paddle-ocr".to_string()),
                threads: parse_env_or("OCR_THREADS", 4),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

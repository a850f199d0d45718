use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnaptextError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("OCR engine error: {0}")]
    Engine(String),

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SnaptextError>;

use async_trait::async_trait;

use crate::error::Result;

/// What an engine returns for one recognition attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub text: String,
    /// Mean per-token confidence on a 0-100 scale.
    pub confidence: f64,
}

/// A single OCR capability. The dispatcher tries engines in priority order
/// and never branches on which implementation it is talking to.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the engine can serve a request right now.
    async fn is_available(&self) -> bool;

    /// Run recognition once. No retries, no timeout.
    async fn recognize(&self, image: &[u8], language: &str) -> Result<EngineOutput>;
}

//! OCR provider port interface

use async_trait::async_trait;
use rostersync_domain::{PositionedToken, Result};

/// Trait for text detection on roster images
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Detect words in an encoded image (PNG/JPEG bytes).
    ///
    /// Returns one token per recognized word, in no particular order. An
    /// image without text yields an empty vector, not an error.
    async fn detect_document_text(&self, image: &[u8]) -> Result<Vec<PositionedToken>>;
}

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rostersync_core::OcrProvider;
use rostersync_domain::{PositionedToken, Result as DomainResult, RosterError};

/// In-memory mock for `OcrProvider`.
///
/// Returns a fixed token list (or a fixed error) for every image and counts
/// how often it was called.
#[derive(Clone, Default)]
pub struct MockOcr {
    tokens: Vec<PositionedToken>,
    error: Option<RosterError>,
    calls: Arc<Mutex<usize>>,
}

impl MockOcr {
    pub fn new(tokens: Vec<PositionedToken>) -> Self {
        Self { tokens, ..Self::default() }
    }

    /// An OCR provider that sees nothing.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn failing(error: RosterError) -> Self {
        Self { error: Some(error), ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl OcrProvider for MockOcr {
    async fn detect_document_text(&self, _image: &[u8]) -> DomainResult<Vec<PositionedToken>> {
        *self.calls.lock().unwrap() += 1;
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.tokens.clone()),
        }
    }
}

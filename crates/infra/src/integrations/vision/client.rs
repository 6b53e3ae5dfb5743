//! Google Vision OCR client

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Method;
use rostersync_core::OcrProvider;
use rostersync_domain::{OcrConfig, Point, PositionedToken, Result, RosterError};
use tracing::{debug, instrument, warn};

use super::types::{
    AnnotateImageRequest, AnnotateRequest, AnnotateResponse, EntityAnnotation, Feature,
    ImageContent,
};
use crate::http::HttpClient;

const VISION_API_BASE: &str = "https://vision.googleapis.com";
const ANNOTATE_PATH: &str = "/v1/images:annotate";
const TEXT_DETECTION: &str = "TEXT_DETECTION";

/// OCR provider backed by the Vision `images:annotate` endpoint.
pub struct GoogleVisionClient {
    http_client: HttpClient,
    api_key: String,
    endpoint: String,
}

impl GoogleVisionClient {
    pub fn new(api_key: impl Into<String>, http_client: HttpClient) -> Self {
        Self { http_client, api_key: api_key.into(), endpoint: VISION_API_BASE.to_string() }
    }

    /// # Errors
    /// Returns `RosterError::Config` when no API key is configured.
    pub fn from_config(config: &OcrConfig, http_client: HttpClient) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RosterError::Config("ocr.api_key is not set".into()))?;

        Ok(Self::new(api_key, http_client).with_endpoint(config.endpoint.clone()))
    }

    /// Point the client at another host (for testing or a proxy).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn annotate_url(&self) -> String {
        format!("{}{}", self.endpoint, ANNOTATE_PATH)
    }
}

#[async_trait]
impl OcrProvider for GoogleVisionClient {
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn detect_document_text(&self, image: &[u8]) -> Result<Vec<PositionedToken>> {
        let payload = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent { content: STANDARD.encode(image) },
                features: vec![Feature { feature_type: TEXT_DETECTION.to_string() }],
            }],
        };

        let request = self
            .http_client
            .request(Method::POST, self.annotate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload);

        let response: AnnotateResponse = self.http_client.send_json(request).await?;
        let tokens = tokens_from_response(response)?;

        debug!(tokens = tokens.len(), "text detection finished");
        Ok(tokens)
    }
}

/// Word tokens from an annotate response, skipping the leading full-text
/// annotation.
fn tokens_from_response(response: AnnotateResponse) -> Result<Vec<PositionedToken>> {
    let Some(image_response) = response.responses.into_iter().next() else {
        warn!("vision returned no responses");
        return Ok(Vec::new());
    };

    if let Some(status) = image_response.error.filter(|status| !status.message.is_empty()) {
        return Err(RosterError::Ocr(format!("{} (code {})", status.message, status.code)));
    }

    Ok(image_response.text_annotations.into_iter().skip(1).map(token_from_annotation).collect())
}

fn token_from_annotation(annotation: EntityAnnotation) -> PositionedToken {
    let vertices = annotation.bounding_poly.map(|poly| poly.vertices).unwrap_or_default();

    let mut polygon = [Point::default(); 4];
    for (slot, vertex) in polygon.iter_mut().zip(vertices) {
        *slot = Point::new(vertex.x, vertex.y);
    }

    PositionedToken::from_polygon(annotation.description, polygon)
}

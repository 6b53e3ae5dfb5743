use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use rostersync_domain::{HttpConfig, RosterError};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("rostersync/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by the Google adapters.
///
/// Only reads (`GET`, `HEAD`) are ever retried, and only when
/// `max_attempts > 1`. A replayed insert could create a second calendar
/// event, so `POST` and `PATCH` go out exactly once.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RetryPolicy {
    max_attempts: usize,
    base_backoff: Duration,
}

impl RetryPolicy {
    fn attempts_for(&self, method: &Method) -> usize {
        if *method == Method::GET || *method == Method::HEAD {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    /// Delay after failed attempt `attempt` (1-based); doubles, capped at 2^6.
    fn delay_after(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(6) as u32;
        self.base_backoff.saturating_mul(1 << exponent)
    }
}

impl HttpClient {
    /// Client with the default `[http]` settings (single attempt).
    pub fn new() -> Result<Self, RosterError> {
        Self::from_config(&HttpConfig::default())
    }

    /// Client configured from the `[http]` config section.
    pub fn from_config(config: &HttpConfig) -> Result<Self, RosterError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(|err| RosterError::from(InfraError::from(err)))?;

        Ok(Self {
            client,
            retry: RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                base_backoff: Duration::from_millis(config.retry_backoff_ms),
            },
        })
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute a request. Reads that hit a transient status or a
    /// connect/timeout failure are retried per the configured policy; the
    /// last response is returned whatever its status.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, RosterError> {
        let request = builder.build().map_err(|err| RosterError::from(InfraError::from(err)))?;
        let method = request.method().clone();
        let url = redact_query(request.url());
        let attempts = self.retry.attempts_for(&method);

        let mut next = Some(request);
        for attempt in 1..=attempts {
            let Some(request) = next.take() else { break };
            if attempt < attempts {
                next = request.try_clone();
            }

            debug!(attempt, %method, %url, "sending HTTP request");
            let outcome = self.client.execute(request).await;

            let transient = match &outcome {
                Ok(response) => is_transient_status(response.status()),
                Err(err) => err.is_timeout() || err.is_connect(),
            };
            if transient && next.is_some() {
                let delay = self.retry.delay_after(attempt);
                warn!(attempt, %method, %url, delay_ms = delay.as_millis() as u64, "transient HTTP failure; retrying");
                tokio::time::sleep(delay).await;
                continue;
            }

            return match outcome {
                Ok(response) => {
                    debug!(attempt, %method, %url, status = %response.status(), "received HTTP response");
                    Ok(response)
                }
                Err(err) => Err(InfraError::from(err).into()),
            };
        }

        Err(RosterError::Internal(format!("{method} {url} was never sent")))
    }

    /// Send and decode a JSON body. Non-success statuses become domain errors
    /// carrying the provider's error text.
    pub async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T, RosterError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(builder).await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InfraError::from_status(status, &error_text).into());
        }

        let bytes = response.bytes().await.map_err(|err| RosterError::from(InfraError::from(err)))?;
        serde_json::from_slice(&bytes).map_err(|err| InfraError::from(err).into())
    }
}

/// Statuses Google documents as safe to retry.
fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// URL for logging with query values dropped (`key=` carries an API key).
fn redact_query(url: &reqwest::Url) -> String {
    let mut redacted = url.clone();
    redacted.set_query(None);
    redacted.to_string()
}

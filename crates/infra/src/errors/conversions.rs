//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use reqwest::StatusCode;
use rostersync_domain::RosterError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RosterError);

impl From<InfraError> for RosterError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RosterError> for InfraError {
    fn from(value: RosterError) -> Self {
        InfraError(value)
    }
}

impl InfraError {
    /// Map a non-success HTTP status (plus the provider's error text) the
    /// same way a `reqwest` status error is mapped.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = format!(
            "HTTP {} {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown status"),
            body.trim()
        );
        InfraError(status_to_error(status, message))
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRosterError {
    fn into_roster(self) -> RosterError;
}

fn status_to_error(status: StatusCode, message: String) -> RosterError {
    match status.as_u16() {
        401 | 403 => RosterError::Auth(message),
        404 => RosterError::NotFound(message),
        429 => RosterError::Network(message),
        400..=499 => RosterError::InvalidInput(message),
        _ => RosterError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RosterError */
/* -------------------------------------------------------------------------- */

impl IntoRosterError for HttpError {
    fn into_roster(self) -> RosterError {
        if self.is_timeout() {
            return RosterError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return RosterError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return RosterError::InvalidInput(format!("unexpected response body: {self}"));
        }

        if let Some(status) = self.status() {
            let message = format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            );
            return status_to_error(status, message);
        }

        RosterError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_roster())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → RosterError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(RosterError::InvalidInput(format!("malformed JSON: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

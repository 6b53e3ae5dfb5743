use std::time::Duration;

use rostersync_domain::{LogFormat, LoggingConfig, RosterError};
use tracing::{error, info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.filter`. Output goes to stderr so command
/// results on stdout stay machine-readable.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if installed.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"roster::sync"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - The failure, `None` on success.
///
/// A photo that could not be read as a roster is the user's to retake, so it
/// logs at `warn`; every other failure logs at `error`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&RosterError>) {
    let duration_ms = elapsed.as_millis() as u64;

    let Some(error) = error else {
        info!(command, duration_ms, "command_execution_success");
        return;
    };

    let error_type = error_label(error);
    if failure_level(error) == Level::WARN {
        warn!(command, duration_ms, error_type, "command_execution_failure");
    } else {
        error!(command, duration_ms, error_type, %error, "command_execution_failure");
    }
}

/// Level a failed command is logged at.
pub fn failure_level(error: &RosterError) -> Level {
    if error.is_roster_content() {
        Level::WARN
    } else {
        Level::ERROR
    }
}

/// Convert a `RosterError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &RosterError) -> &'static str {
    match error {
        RosterError::Config(_) => "config",
        RosterError::Network(_) => "network",
        RosterError::Auth(_) => "auth",
        RosterError::Ocr(_) => "ocr",
        RosterError::HeaderNotFound(_) => "header_not_found",
        RosterError::InvalidHeader(_) => "invalid_header",
        RosterError::UnknownShiftCode(_) => "unknown_shift_code",
        RosterError::NotFound(_) => "not_found",
        RosterError::InvalidInput(_) => "invalid_input",
        RosterError::Internal(_) => "internal",
    }
}

//! Configuration loader
//!
//! Loads application configuration from a file and environment variables.
//!
//! ## Loading Strategy
//! 1. Use `ROSTERSYNC_CONFIG` if set, otherwise probe the standard paths
//! 2. Parse the file as JSON or TOML (by extension); start from defaults when
//!    no file exists
//! 3. Overlay `ROSTERSYNC_*` environment variables, which always win
//! 4. Validate the result
//!
//! ## Environment Variables
//! - `ROSTERSYNC_CONFIG`: Explicit config file path
//! - `ROSTERSYNC_OCR_API_KEY`: Vision API key
//! - `ROSTERSYNC_OCR_ENDPOINT`: Vision API host
//! - `ROSTERSYNC_CALENDAR_ACCESS_TOKEN`: Calendar OAuth access token
//! - `ROSTERSYNC_CALENDAR_ID`: Target calendar id
//! - `ROSTERSYNC_CALENDAR_API_BASE`: Calendar API root
//! - `ROSTERSYNC_TIME_ZONE`: IANA zone for roster times
//! - `ROSTERSYNC_LINE_TOLERANCE_PX`: Line clustering tolerance in pixels
//! - `ROSTERSYNC_SHIFT_DURATION_HOURS`: Length of a timed shift
//! - `ROSTERSYNC_SESSION_TTL_SECS`: Pending confirmation lifetime
//! - `ROSTERSYNC_HTTP_TIMEOUT_SECS`: Per-request timeout
//! - `ROSTERSYNC_HTTP_MAX_ATTEMPTS`: Attempts per read request (1 = no retry)
//! - `ROSTERSYNC_HTTP_RETRY_BACKOFF_MS`: Delay before the first retry
//! - `ROSTERSYNC_LOG_FORMAT`: `text` or `json`
//! - `ROSTERSYNC_LOG_FILTER`: Default `EnvFilter` directive
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./rostersync.json` or `./rostersync.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rostersync_domain::{AppConfig, LogFormat, Result, RosterError};

/// Load, overlay and validate configuration.
///
/// # Errors
/// Returns `RosterError::Config` if:
/// - An explicitly named file is missing or unreadable
/// - File format is invalid
/// - An environment variable has an invalid value
/// - The merged configuration fails validation
pub fn load() -> Result<AppConfig> {
    let base = match env_var("ROSTERSYNC_CONFIG") {
        Some(path) => load_from_file(Some(PathBuf::from(path)))?,
        None => match probe_config_paths() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::debug!("No config file found, starting from defaults");
                AppConfig::default()
            }
        },
    };

    let config = apply_env_overrides(base)?;
    config.validate()?;
    Ok(config)
}

/// Overlay `ROSTERSYNC_*` variables onto `config`.
///
/// # Errors
/// Returns `RosterError::Config` for variables with invalid values.
pub fn apply_env_overrides(mut config: AppConfig) -> Result<AppConfig> {
    if let Some(key) = env_var("ROSTERSYNC_OCR_API_KEY") {
        config.ocr.api_key = Some(key);
    }
    if let Some(endpoint) = env_var("ROSTERSYNC_OCR_ENDPOINT") {
        config.ocr.endpoint = endpoint;
    }
    if let Some(token) = env_var("ROSTERSYNC_CALENDAR_ACCESS_TOKEN") {
        config.calendar.access_token = Some(token);
    }
    if let Some(calendar_id) = env_var("ROSTERSYNC_CALENDAR_ID") {
        config.calendar.calendar_id = calendar_id;
    }
    if let Some(api_base) = env_var("ROSTERSYNC_CALENDAR_API_BASE") {
        config.calendar.api_base = api_base;
    }
    if let Some(time_zone) = env_var("ROSTERSYNC_TIME_ZONE") {
        config.schedule.time_zone = time_zone;
    }
    if let Some(tolerance) = env_parse::<u32>("ROSTERSYNC_LINE_TOLERANCE_PX")? {
        config.schedule.line_tolerance_px = tolerance;
    }
    if let Some(hours) = env_parse::<u32>("ROSTERSYNC_SHIFT_DURATION_HOURS")? {
        config.schedule.shift_duration_hours = hours;
    }
    if let Some(ttl) = env_parse::<u64>("ROSTERSYNC_SESSION_TTL_SECS")? {
        config.session.ttl_secs = ttl;
    }
    if let Some(timeout) = env_parse::<u64>("ROSTERSYNC_HTTP_TIMEOUT_SECS")? {
        config.http.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parse::<usize>("ROSTERSYNC_HTTP_MAX_ATTEMPTS")? {
        config.http.max_attempts = attempts;
    }
    if let Some(backoff) = env_parse::<u64>("ROSTERSYNC_HTTP_RETRY_BACKOFF_MS")? {
        config.http.retry_backoff_ms = backoff;
    }
    if let Some(format) = env_parse::<LogFormat>("ROSTERSYNC_LOG_FORMAT")? {
        config.logging.format = format;
    }
    if let Some(filter) = env_var("ROSTERSYNC_LOG_FILTER") {
        config.logging.filter = filter;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `RosterError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RosterError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RosterError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RosterError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `RosterError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RosterError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RosterError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RosterError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "rostersync.json", "rostersync.toml"];

    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
            roots.push(exe_dir.join(".."));
        }
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Non-empty environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `RosterError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    env_var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| RosterError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

//! Error types for Solidafy RestList
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! List controllers never surface these errors directly: a failed fetch is
//! folded into an [`ErrorCode`] plus message and recorded on the controller.

use std::fmt;
use thiserror::Error;

/// The main error type for Solidafy RestList
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Payload Errors
    // ============================================================================
    #[error("Failed to extract records from path '{path}': {message}")]
    RecordExtraction { path: String, message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("XML parsing error: {message}")]
    XmlParse { message: String },

    #[error("Payload has no value for id field '{field}'")]
    MissingId { field: String },

    #[error("Nothing to insert, check the response shape")]
    EmptyPage,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an XML parse error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::XmlParse {
            message: message.into(),
        }
    }

    /// Create a missing id error
    pub fn missing_id(field: impl Into<String>) -> Self {
        Self::MissingId {
            field: field.into(),
        }
    }

    /// Classify this error for the list controller
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Http(e) if e.is_timeout() => ErrorCode::Timeout,
            Error::Http(_) => ErrorCode::Network,
            Error::HttpStatus { status, .. } => ErrorCode::HttpStatus(*status),
            Error::Timeout { .. } => ErrorCode::Timeout,
            Error::JsonParse(_)
            | Error::RecordExtraction { .. }
            | Error::Decode { .. }
            | Error::XmlParse { .. }
            | Error::MissingId { .. } => ErrorCode::Decode,
            Error::EmptyPage => ErrorCode::EmptyPage,
            _ => ErrorCode::Other,
        }
    }
}

/// Error code recorded by a list controller when a fetch fails
///
/// Transport failures carry the transport's own classification; `EmptyPage`
/// marks a request that succeeded but yielded nothing to insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCode {
    /// No error recorded yet
    #[default]
    NoError,
    /// Connection-level failure
    Network,
    /// The request timed out
    Timeout,
    /// The server answered with a non-success status
    HttpStatus(u16),
    /// The response body could not be decoded
    Decode,
    /// The page decoded to zero records
    EmptyPage,
    /// Anything else
    Other,
}

impl ErrorCode {
    /// Whether the request itself reached the server and failed there or on the wire
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::HttpStatus(_))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoError => write!(f, "no_error"),
            Self::Network => write!(f, "network"),
            Self::Timeout => write!(f, "timeout"),
            Self::HttpStatus(status) => write!(f, "http_{status}"),
            Self::Decode => write!(f, "decode"),
            Self::EmptyPage => write!(f, "empty_page"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Result type alias for Solidafy RestList
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_id("id");
        assert_eq!(err.to_string(), "Payload has no value for id field 'id'");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(Error::http_status(503, "").code(), ErrorCode::HttpStatus(503));
        assert_eq!(Error::Timeout { timeout_ms: 10 }.code(), ErrorCode::Timeout);
        assert_eq!(Error::decode("bad").code(), ErrorCode::Decode);
        assert_eq!(Error::xml("bad").code(), ErrorCode::Decode);
        assert_eq!(Error::missing_id("id").code(), ErrorCode::Decode);
        assert_eq!(Error::EmptyPage.code(), ErrorCode::EmptyPage);
        assert_eq!(Error::config("x").code(), ErrorCode::Other);
    }

    #[test]
    fn test_error_code_transport() {
        assert!(ErrorCode::HttpStatus(500).is_transport());
        assert!(ErrorCode::Network.is_transport());
        assert!(!ErrorCode::EmptyPage.is_transport());
        assert!(!ErrorCode::NoError.is_transport());
        assert_eq!(ErrorCode::HttpStatus(404).to_string(), "http_404");
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}

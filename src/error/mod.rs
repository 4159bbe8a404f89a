//! Error handling for the transport connectivity tester

use thiserror::Error;

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AppError>;

/// Custom error types for the transport connectivity tester
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (bad descriptor, bad index, bad reporter URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport dialer construction errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// DNS query errors
    #[error("DNS error: {0}")]
    Dns(String),

    /// Report collection errors
    #[error("Collect error: {0}")]
    Collect(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// I/O errors (settings file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (URLs, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// Create a new DNS error
    pub fn dns<S: Into<String>>(message: S) -> Self {
        Self::Dns(message.into())
    }

    /// Create a new collect error
    pub fn collect<S: Into<String>>(message: S) -> Self {
        Self::Collect(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Transport(_) => "TRANSPORT",
            Self::Network(_) => "NETWORK",
            Self::Dns(_) => "DNS",
            Self::Collect(_) => "COLLECT",
            Self::Timeout(_) => "TIMEOUT",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if error is recoverable (can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Dns(_) | Self::Collect(_) | Self::Timeout(_) => true,
            Self::Config(_) | Self::Transport(_) | Self::Parse(_) => false,
            Self::Io(_) | Self::Internal(_) => false,
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1,
            Self::Transport(_) | Self::Network(_) | Self::Dns(_) => 2,
            Self::Timeout(_) => 3,
            Self::Collect(_) => 4,
            Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else {
            Self::collect(error.to_string())
        }
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(AppError::config("x").category(), "CONFIG");
        assert_eq!(AppError::transport("x").category(), "TRANSPORT");
        assert_eq!(AppError::collect("x").category(), "COLLECT");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(AppError::network("refused").is_recoverable());
        assert!(AppError::collect("503").is_recoverable());
        assert!(!AppError::config("bad descriptor").is_recoverable());
        assert!(!AppError::transport("unsupported scheme").is_recoverable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), 1);
        assert_eq!(AppError::network("x").exit_code(), 2);
        assert_eq!(AppError::internal("x").exit_code(), 99);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.category(), "IO");
    }

    #[test]
    fn test_anyhow_integration() {
        let anyhow_error = anyhow::anyhow!("wrapped failure");
        let app_error: AppError = anyhow_error.into();
        assert_eq!(app_error.category(), "INTERNAL");

        let app_error = AppError::config("bad descriptor");
        let anyhow_error = anyhow::anyhow!(app_error);
        assert!(anyhow_error.to_string().contains("Configuration error"));
    }
}

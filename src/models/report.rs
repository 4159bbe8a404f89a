//! Connectivity report data model
//!
//! A report captures the outcome of one probe: which resolver was targeted,
//! over which protocol, through which (sanitized) transport, when, how long
//! it took, and the structured error if the probe failed. Reports are
//! immutable once constructed except for the `collected` flag, which the
//! submission orchestrator sets after delivery is confirmed.

use crate::types::Protocol;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Structured cause of a failed probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Operation that failed (e.g. "connect", "send", "receive")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,

    /// POSIX error name if one could be determined (e.g. "ECONNREFUSED")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posix_error: Option<String>,

    /// Innermost cause of the error chain
    pub msg: String,
}

impl ErrorInfo {
    /// Create an error record with operation and POSIX error context
    pub fn new<S: Into<String>>(op: Option<String>, posix_error: Option<String>, msg: S) -> Self {
        Self {
            op,
            posix_error,
            msg: msg.into(),
        }
    }

    /// Create an error record carrying only a message
    pub fn from_message<S: Into<String>>(msg: S) -> Self {
        Self {
            op: None,
            posix_error: None,
            msg: msg.into(),
        }
    }

    /// Build an error record from an error chain, unwrapping to the root cause
    pub fn from_error(op: Option<String>, posix_error: Option<String>, err: &dyn std::error::Error) -> Self {
        Self {
            op,
            posix_error,
            msg: root_cause_message(err),
        }
    }
}

/// Walk an error's source chain and return the innermost cause's message
pub fn root_cause_message(err: &dyn std::error::Error) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/// Result of one connectivity probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    /// Address of the DNS resolver the probe targeted (host:port)
    pub resolver: String,

    /// Protocol the probe ran over
    pub proto: Protocol,

    /// Transport descriptor with credentials redacted
    pub transport: String,

    /// When the probe started, UTC, whole-second precision
    pub time: DateTime<Utc>,

    /// Wall-clock probe duration in milliseconds
    pub duration_ms: u64,

    /// Structured failure, absent on success
    pub error: Option<ErrorInfo>,

    /// Whether the report has been delivered to a collector
    pub collected: bool,
}

impl ConnectivityReport {
    /// Create a successful report
    pub fn success(
        resolver: String,
        proto: Protocol,
        transport: String,
        time: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        Self {
            resolver,
            proto,
            transport,
            time: truncate_to_seconds(time),
            duration_ms,
            error: None,
            collected: false,
        }
    }

    /// Create a failed report
    pub fn failure(
        resolver: String,
        proto: Protocol,
        transport: String,
        time: DateTime<Utc>,
        duration_ms: u64,
        error: ErrorInfo,
    ) -> Self {
        Self {
            resolver,
            proto,
            transport,
            time: truncate_to_seconds(time),
            duration_ms,
            error: Some(error),
            collected: false,
        }
    }

    /// A probe succeeded iff no error was recorded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Truncate a timestamp to whole-second precision.
///
/// Idempotent: truncating twice equals truncating once.
pub fn truncate_to_seconds(time: DateTime<Utc>) -> DateTime<Utc> {
    time.with_nanosecond(0).unwrap_or(time)
}

/// Current UTC time at whole-second precision, as recorded in reports
pub fn report_timestamp() -> DateTime<Utc> {
    truncate_to_seconds(Utc::now())
}

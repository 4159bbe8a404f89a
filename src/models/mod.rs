//! Data models and structures for the transport connectivity tester

pub mod report;
pub mod settings;

// Re-export main model types
pub use report::{report_timestamp, root_cause_message, truncate_to_seconds, ConnectivityReport, ErrorInfo};
pub use settings::{AppSettings, TransportConfig};

//! Transport Connectivity Tester
//!
//! Probes whether transport configurations can establish outbound
//! connectivity over both stream and datagram protocols to a DNS resolver
//! for a target domain, aggregates per-configuration health, and submits
//! the resulting reports to a collection endpoint with bounded retries and
//! fractional sampling.

pub mod cli;
pub mod collector;
pub mod dns;
pub mod error;
pub mod executor;
pub mod health;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod store;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use collector::{build_collector, submit_all, Collector};
pub use error::{AppError, Result};
pub use executor::ConnectivityTester;
pub use health::classify;
pub use models::{AppSettings, ConnectivityReport, ErrorInfo, TransportConfig};
pub use types::{HealthCode, Protocol};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_DOMAIN: &str = "example.com";
    pub const DEFAULT_RESOLVER_HOST: &str = "8.8.8.8";
    pub const DEFAULT_RESOLVER_PORT: u16 = 53;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}

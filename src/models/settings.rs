//! Application settings data model
//!
//! Field names in the persisted JSON document are fixed: the resolver host
//! is stored under `dnsList` and the reporter URL under `reporter`, so
//! settings documents from earlier releases keep loading.

use crate::models::ConnectivityReport;
use crate::types::{HealthCode, Protocol};
use serde::{Deserialize, Serialize};

/// One transport configuration and its last test results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Opaque transport descriptor (may carry credentials; sanitized before
    /// it appears in any report)
    pub transport: String,

    /// Reports from the most recent test run, fully replaced each run
    #[serde(rename = "testReport", default)]
    pub test_reports: Vec<ConnectivityReport>,

    /// Aggregate health derived from the most recent test run
    #[serde(default)]
    pub health: HealthCode,
}

impl TransportConfig {
    /// Create a configuration for a transport descriptor
    pub fn new<S: Into<String>>(transport: S) -> Self {
        Self {
            transport: transport.into(),
            test_reports: Vec::new(),
            health: HealthCode::Unknown,
        }
    }
}

/// Application settings: the target domain, resolver, protocol toggles,
/// reporter endpoint, and the configuration list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Domain the connectivity check resolves
    #[serde(default = "default_domain")]
    pub domain: String,

    /// DNS resolver host the probes target
    #[serde(rename = "dnsList", default = "default_resolver_host")]
    pub resolver_host: String,

    /// Probe over TCP
    #[serde(default = "default_true")]
    pub tcp: bool,

    /// Probe over UDP
    #[serde(default = "default_true")]
    pub udp: bool,

    /// Report collection endpoint; empty means write reports to stdout
    #[serde(rename = "reporter", default)]
    pub reporter_url: String,

    /// Local listen address for the proxy front-end, kept for settings
    /// document compatibility
    #[serde(rename = "localAddress", default)]
    pub local_address: String,

    /// Transport configurations under test
    #[serde(default)]
    pub configs: Vec<TransportConfig>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            resolver_host: default_resolver_host(),
            tcp: true,
            udp: true,
            reporter_url: String::new(),
            local_address: String::new(),
            configs: Vec::new(),
        }
    }
}

impl AppSettings {
    /// Protocols enabled for probing, in fixed iteration order
    pub fn enabled_protocols(&self) -> Vec<Protocol> {
        let mut protocols = Vec::with_capacity(2);
        if self.tcp {
            protocols.push(Protocol::Tcp);
        }
        if self.udp {
            protocols.push(Protocol::Udp);
        }
        protocols
    }

    /// Append a configuration for a transport descriptor
    pub fn add_config<S: Into<String>>(&mut self, transport: S) {
        self.configs.push(TransportConfig::new(transport));
    }
}

fn default_domain() -> String {
    crate::defaults::DEFAULT_DOMAIN.to_string()
}

fn default_resolver_host() -> String {
    crate::defaults::DEFAULT_RESOLVER_HOST.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.domain, "example.com");
        assert_eq!(settings.resolver_host, "8.8.8.8");
        assert!(settings.tcp);
        assert!(settings.udp);
        assert!(settings.configs.is_empty());
    }

    #[test]
    fn test_enabled_protocols() {
        let mut settings = AppSettings::default();
        assert_eq!(settings.enabled_protocols(), vec![Protocol::Tcp, Protocol::Udp]);

        settings.udp = false;
        assert_eq!(settings.enabled_protocols(), vec![Protocol::Tcp]);

        settings.tcp = false;
        assert!(settings.enabled_protocols().is_empty());
    }

    #[test]
    fn test_persisted_field_names() {
        let mut settings = AppSettings::default();
        settings.reporter_url = "https://collector.example/reports".to_string();
        settings.add_config("socks5://proxy.example:1080");

        let value: serde_json::Value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["dnsList"], "8.8.8.8");
        assert_eq!(value["reporter"], "https://collector.example/reports");
        assert!(value["configs"][0]["testReport"].is_array());
        assert_eq!(value["configs"][0]["health"], 0);
    }

    #[test]
    fn test_loads_minimal_document() {
        let settings: AppSettings = serde_json::from_str(r#"{"configs":[{"transport":""}]}"#).unwrap();
        assert_eq!(settings.domain, "example.com");
        assert!(settings.tcp && settings.udp);
        assert_eq!(settings.configs.len(), 1);
        assert_eq!(settings.configs[0].health, HealthCode::Unknown);
    }
}

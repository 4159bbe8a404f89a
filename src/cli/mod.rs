//! Command-line interface

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Transport Connectivity Tester - probes transport configurations and
/// reports per-configuration health
#[derive(Parser, Debug, Clone)]
#[command(name = "tct")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path of the settings document
    #[arg(long, env = "TCT_SETTINGS", default_value = crate::store::DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Override the target domain for connectivity checks
    #[arg(long, env = "TCT_DOMAIN")]
    pub domain: Option<String>,

    /// Override the DNS resolver host probes target
    #[arg(long, env = "TCT_RESOLVER")]
    pub resolver: Option<String>,

    /// Override the report collection endpoint (empty writes to stdout)
    #[arg(long, env = "TCT_REPORTER")]
    pub reporter: Option<String>,

    /// Append a transport configuration (can be used multiple times)
    #[arg(long = "add", action = ArgAction::Append, value_name = "DESCRIPTOR")]
    pub add: Vec<String>,

    /// Test only the configuration at this index
    #[arg(long, value_name = "N")]
    pub index: Option<usize>,

    /// Submit reports to the collection endpoint after testing
    #[arg(long)]
    pub submit: bool,

    /// List configurations and their last health without testing
    #[arg(long)]
    pub list: bool,

    /// Skip stream (TCP) probes for this run
    #[arg(long)]
    pub no_tcp: bool,

    /// Skip datagram (UDP) probes for this run
    #[arg(long)]
    pub no_udp: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.no_tcp && self.no_udp {
            return Err("Cannot disable both TCP and UDP probing".to_string());
        }

        if self.list && self.index.is_some() {
            return Err("--list does not combine with --index".to_string());
        }

        if self.list && self.submit {
            return Err("--list does not combine with --submit".to_string());
        }

        Ok(())
    }

    /// Apply CLI overrides onto loaded settings
    pub fn apply_to(&self, settings: &mut crate::models::AppSettings) {
        if let Some(domain) = &self.domain {
            settings.domain = domain.clone();
        }
        if let Some(resolver) = &self.resolver {
            settings.resolver_host = resolver.clone();
        }
        if let Some(reporter) = &self.reporter {
            settings.reporter_url = reporter.clone();
        }
        if self.no_tcp {
            settings.tcp = false;
        }
        if self.no_udp {
            settings.udp = false;
        }
        for descriptor in &self.add {
            settings.add_config(descriptor.clone());
        }
    }
}

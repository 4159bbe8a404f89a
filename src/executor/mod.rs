//! Configuration test orchestration
//!
//! Fans the protocol probe runner out across the enabled protocol set for
//! one configuration, and across all configurations for a full sweep. Each
//! configuration's probes run as parallel tasks; a short-lived mutex guards
//! the per-configuration success accumulator while reports are appended in
//! completion order. Health is recomputed from the fresh reports once every
//! probe of the run has joined.

use crate::defaults::DEFAULT_RESOLVER_PORT;
use crate::error::{AppError, Result};
use crate::health::classify;
use crate::logging::Logger;
use crate::models::{AppSettings, ConnectivityReport};
use crate::probe;
use crate::transport::{ensure_port, sanitize_descriptor};
use crate::types::{HealthCode, Protocol};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Orchestrates connectivity test runs over the settings' configurations
pub struct ConnectivityTester {
    logger: Logger,
}

impl ConnectivityTester {
    /// Create a tester that logs through the given logger
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Test a single configuration in place.
    ///
    /// An out-of-range index or an unsanitizable descriptor is a recoverable
    /// configuration error; the configuration's previous reports are kept
    /// when the run never starts.
    pub async fn test_one(&self, settings: &mut AppSettings, index: usize) -> Result<()> {
        if index >= settings.configs.len() {
            return Err(AppError::config(format!(
                "configuration index {} is out of range (have {})",
                index,
                settings.configs.len()
            )));
        }

        let plan = ProbePlan::from_settings(settings);
        let transport = settings.configs[index].transport.clone();
        let (reports, health) = self.run_config_probes(&transport, &plan).await?;

        let config = &mut settings.configs[index];
        config.test_reports = reports;
        config.health = health;
        Ok(())
    }

    /// Test every configuration concurrently, with no concurrency cap.
    ///
    /// Blocks until all configurations have completed. Per-configuration
    /// errors do not stop the sweep; they are returned aggregated with the
    /// index of the configuration that produced them.
    pub async fn test_all(&self, settings: &mut AppSettings) -> Vec<(usize, AppError)> {
        let plan = ProbePlan::from_settings(settings);
        self.logger.info(&format!(
            "testing {} configuration(s) against {}",
            settings.configs.len(),
            plan.resolver_address
        ));

        let tasks: Vec<_> = settings
            .configs
            .iter()
            .enumerate()
            .map(|(index, config)| {
                let transport = config.transport.clone();
                let plan = plan.clone();
                let tester = self.clone_for_task();
                tokio::spawn(async move {
                    (index, tester.run_config_probes(&transport, &plan).await)
                })
            })
            .collect();

        let mut failures = Vec::new();
        for joined in join_all(tasks).await {
            match joined {
                Ok((index, Ok((reports, health)))) => {
                    let config = &mut settings.configs[index];
                    config.test_reports = reports;
                    config.health = health;
                }
                Ok((index, Err(e))) => {
                    self.logger.warn(&format!("configuration {} failed: {}", index, e));
                    failures.push((index, e));
                }
                Err(e) => {
                    self.logger.error(&format!("test task panicked: {}", e));
                }
            }
        }
        failures
    }

    /// Run all enabled protocol probes for one transport descriptor.
    ///
    /// Probes run as parallel tasks; the report list and the success-flag
    /// accumulator are appended under a mutex held only for the push. The
    /// join barrier guarantees health is computed from the complete run.
    async fn run_config_probes(
        &self,
        transport: &str,
        plan: &ProbePlan,
    ) -> Result<(Vec<ConnectivityReport>, HealthCode)> {
        let sanitized = sanitize_descriptor(transport)?;

        let reports: Arc<Mutex<Vec<ConnectivityReport>>> = Arc::new(Mutex::new(Vec::new()));
        let healthy: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));

        let tasks: Vec<_> = plan
            .protocols
            .iter()
            .map(|&protocol| {
                let transport = transport.to_string();
                let sanitized = sanitized.clone();
                let resolver_address = plan.resolver_address.clone();
                let domain = plan.domain.clone();
                let logger = self.logger.child(format!("probe:{}", protocol));
                let reports = reports.clone();
                let healthy = healthy.clone();
                tokio::spawn(async move {
                    let report = probe::probe(
                        &transport,
                        &sanitized,
                        protocol,
                        &resolver_address,
                        &domain,
                        &logger,
                    )
                    .await;
                    let success = report.is_success();
                    reports.lock().await.push(report);
                    healthy.lock().await.push(success);
                })
            })
            .collect();

        let _ = join_all(tasks).await;

        let reports = std::mem::take(&mut *reports.lock().await);
        let flags = std::mem::take(&mut *healthy.lock().await);
        Ok((reports, classify(flags)))
    }

    fn clone_for_task(&self) -> Self {
        Self {
            logger: self.logger.clone(),
        }
    }
}

/// Immutable inputs shared by every probe of a run
#[derive(Debug, Clone)]
struct ProbePlan {
    resolver_address: String,
    domain: String,
    protocols: Vec<Protocol>,
}

impl ProbePlan {
    fn from_settings(settings: &AppSettings) -> Self {
        Self {
            resolver_address: ensure_port(&settings.resolver_host, DEFAULT_RESOLVER_PORT),
            domain: settings.domain.clone(),
            protocols: settings.enabled_protocols(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::models::TransportConfig;

    fn tester() -> ConnectivityTester {
        ConnectivityTester::new(Logger::new("executor-test").with_min_level(LogLevel::Error))
    }

    fn settings_with(configs: Vec<TransportConfig>) -> AppSettings {
        AppSettings {
            configs,
            ..AppSettings::default()
        }
    }

    #[tokio::test]
    async fn test_one_rejects_out_of_range_index() {
        let mut settings = settings_with(vec![TransportConfig::new("")]);
        let err = tester().test_one(&mut settings, 5).await.unwrap_err();
        assert_eq!(err.category(), "CONFIG");
    }

    #[tokio::test]
    async fn test_one_rejects_bad_descriptor_and_keeps_old_reports() {
        let mut settings = settings_with(vec![TransportConfig::new("http://not-supported")]);
        settings.configs[0].test_reports = vec![crate::models::ConnectivityReport::success(
            "8.8.8.8:53".to_string(),
            Protocol::Tcp,
            String::new(),
            chrono::Utc::now(),
            1,
        )];
        settings.configs[0].health = HealthCode::AllPassed;

        let err = tester().test_one(&mut settings, 0).await.unwrap_err();
        assert_eq!(err.category(), "CONFIG");
        assert_eq!(settings.configs[0].test_reports.len(), 1);
        assert_eq!(settings.configs[0].health, HealthCode::AllPassed);
    }

    #[tokio::test]
    async fn test_one_with_no_enabled_protocols_yields_unknown() {
        let mut settings = settings_with(vec![TransportConfig::new("")]);
        settings.tcp = false;
        settings.udp = false;

        tester().test_one(&mut settings, 0).await.unwrap();
        assert!(settings.configs[0].test_reports.is_empty());
        assert_eq!(settings.configs[0].health, HealthCode::Unknown);
    }

    #[tokio::test]
    async fn test_all_aggregates_config_errors() {
        let mut settings = settings_with(vec![
            TransportConfig::new("http://bad-scheme"),
            TransportConfig::new("%%also bad%%"),
        ]);
        settings.tcp = false;
        settings.udp = false;

        let failures = tester().test_all(&mut settings).await;
        assert_eq!(failures.len(), 2);
        let failed_indexes: Vec<usize> = failures.iter().map(|(i, _)| *i).collect();
        assert!(failed_indexes.contains(&0));
        assert!(failed_indexes.contains(&1));
    }

    #[test]
    fn test_probe_plan_trims_and_appends_port() {
        let mut settings = settings_with(Vec::new());
        settings.resolver_host = "  9.9.9.9  ".to_string();
        let plan = ProbePlan::from_settings(&settings);
        assert_eq!(plan.resolver_address, "9.9.9.9:53");
    }
}

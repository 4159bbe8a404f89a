//! Report collection pipeline
//!
//! A `Collector` delivers one connectivity report to a destination. The
//! pipeline is composed of nested decorators over that single capability:
//! a sink (remote HTTP endpoint or local writer), a retry stage bounding
//! re-delivery attempts, and an outermost sampling stage that decides per
//! report class whether delivery happens at all. A report dropped by
//! sampling never touches the inner stages and consumes no retry budget.

use crate::error::{AppError, Result};
use crate::logging::Logger;
use crate::models::{AppSettings, ConnectivityReport};
use async_trait::async_trait;
use futures::future::join_all;
use rand::Rng;
use reqwest::Client;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Additional delivery attempts after the first failure
pub const MAX_RETRY: u32 = 3;

/// Backoff before the first retry; doubles on each subsequent retry
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Per-request cap on the remote sink's HTTP call
pub const COLLECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers one report to a destination
#[async_trait]
pub trait Collector: Send + Sync {
    /// Deliver the report, returning an error if delivery failed
    async fn collect(&self, report: &ConnectivityReport) -> Result<()>;
}

impl std::fmt::Debug for dyn Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Collector")
    }
}

/// Sink that writes serialized reports to a local writer, one JSON line each
pub struct WriteCollector {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl WriteCollector {
    /// Create a collector writing to the given writer
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Create a collector writing to standard output
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

#[async_trait]
impl Collector for WriteCollector {
    async fn collect(&self, report: &ConnectivityReport) -> Result<()> {
        let mut line = serde_json::to_vec(report)?;
        line.push(b'\n');
        let mut writer = self.writer.lock().await;
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Sink that POSTs serialized reports to a remote HTTP endpoint
pub struct RemoteCollector {
    collector_url: Url,
    client: Client,
}

impl RemoteCollector {
    /// Create a remote sink with the fixed per-request timeout
    pub fn new(collector_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(COLLECT_TIMEOUT)
            .build()
            .map_err(|e| AppError::network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            collector_url,
            client,
        })
    }
}

#[async_trait]
impl Collector for RemoteCollector {
    async fn collect(&self, report: &ConnectivityReport) -> Result<()> {
        let response = self
            .client
            .post(self.collector_url.clone())
            .json(report)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::collect(format!(
                "collector endpoint returned {}",
                status
            )));
        }
        Ok(())
    }
}

/// Retries a wrapped collector with monotonically growing backoff
pub struct RetryCollector {
    inner: Box<dyn Collector>,
    max_retry: u32,
    initial_delay: Duration,
}

impl RetryCollector {
    /// Wrap a collector with an explicit retry budget and initial delay
    pub fn new(inner: Box<dyn Collector>, max_retry: u32, initial_delay: Duration) -> Self {
        Self {
            inner,
            max_retry,
            initial_delay,
        }
    }

    /// Wrap a collector with the default budget (3 retries, 1s backoff)
    pub fn with_defaults(inner: Box<dyn Collector>) -> Self {
        Self::new(inner, MAX_RETRY, INITIAL_RETRY_DELAY)
    }
}

#[async_trait]
impl Collector for RetryCollector {
    async fn collect(&self, report: &ConnectivityReport) -> Result<()> {
        let mut last_error = match self.inner.collect(report).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        let mut delay = self.initial_delay;
        for _ in 0..self.max_retry {
            tokio::time::sleep(delay).await;
            match self.inner.collect(report).await {
                Ok(()) => return Ok(()),
                Err(e) => last_error = e,
            }
            delay *= 2;
        }
        Err(last_error)
    }
}

/// Probabilistically gates delivery per report class.
///
/// Fractions are clamped to [0, 1]; at 1.0 every report of that class is
/// delivered, below that a report is dropped (and trivially succeeds) with
/// probability `1 - fraction`.
pub struct SamplingCollector {
    inner: Box<dyn Collector>,
    success_fraction: f64,
    failure_fraction: f64,
}

impl SamplingCollector {
    /// Wrap a collector with per-class sampling fractions
    pub fn new(inner: Box<dyn Collector>, success_fraction: f64, failure_fraction: f64) -> Self {
        Self {
            inner,
            success_fraction: success_fraction.clamp(0.0, 1.0),
            failure_fraction: failure_fraction.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl Collector for SamplingCollector {
    async fn collect(&self, report: &ConnectivityReport) -> Result<()> {
        let fraction = if report.is_success() {
            self.success_fraction
        } else {
            self.failure_fraction
        };
        if rand::thread_rng().gen::<f64>() < fraction {
            self.inner.collect(report).await
        } else {
            Ok(())
        }
    }
}

/// Compose the collection pipeline for a reporter URL.
///
/// A non-empty URL yields sampling(retry(remote)); an empty or
/// whitespace-only URL yields the local stdout sink. An unparseable URL is
/// a configuration error.
pub fn build_collector(reporter_url: &str) -> Result<Arc<dyn Collector>> {
    build_collector_with_fractions(reporter_url, 1.0, 1.0)
}

/// Compose the collection pipeline with explicit sampling fractions
pub fn build_collector_with_fractions(
    reporter_url: &str,
    success_fraction: f64,
    failure_fraction: f64,
) -> Result<Arc<dyn Collector>> {
    let reporter_url = reporter_url.trim();
    if reporter_url.is_empty() {
        return Ok(Arc::new(WriteCollector::stdout()));
    }

    let url = Url::parse(reporter_url)
        .map_err(|e| AppError::config(format!("invalid reporter URL '{}': {}", reporter_url, e)))?;
    let remote = RemoteCollector::new(url)?;
    let retry = RetryCollector::with_defaults(Box::new(remote));
    let sampling = SamplingCollector::new(Box::new(retry), success_fraction, failure_fraction);
    Ok(Arc::new(sampling))
}

/// Submit every report of every configuration through the collection
/// pipeline, one concurrent task per report.
///
/// Blocks until every delivery attempt (including retries) has completed.
/// Each report's `collected` flag records its outcome; delivery failures
/// are logged and never escalated.
pub async fn submit_all(settings: &mut AppSettings, logger: &Logger) -> Result<()> {
    let collector = build_collector(&settings.reporter_url)?;
    submit_all_with(settings, collector, logger).await;
    Ok(())
}

/// Submission fan-out over an already-built collector
pub async fn submit_all_with(
    settings: &mut AppSettings,
    collector: Arc<dyn Collector>,
    logger: &Logger,
) {
    let total: usize = settings.configs.iter().map(|c| c.test_reports.len()).sum();
    logger.info(&format!("submitting {} report(s)", total));

    let mut tasks = Vec::with_capacity(total);
    for (config_index, config) in settings.configs.iter().enumerate() {
        for (report_index, report) in config.test_reports.iter().enumerate() {
            let collector = collector.clone();
            let report = report.clone();
            let logger = logger.child("collect");
            tasks.push(tokio::spawn(async move {
                match collector.collect(&report).await {
                    Ok(()) => (config_index, report_index, true),
                    Err(e) => {
                        logger.warn(&format!("failed to collect report: {}", e));
                        (config_index, report_index, false)
                    }
                }
            }));
        }
    }

    let mut collected = 0usize;
    for joined in join_all(tasks).await {
        match joined {
            Ok((config_index, report_index, success)) => {
                settings.configs[config_index].test_reports[report_index].collected = success;
                if success {
                    collected += 1;
                }
            }
            Err(e) => {
                logger.error(&format!("submission task panicked: {}", e));
            }
        }
    }
    logger.info(&format!("collected {}/{} report(s)", collected, total));
}

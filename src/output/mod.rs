//! Output formatting and display
//!
//! Renders the per-configuration health summary for the terminal, with
//! colored status indicators and optional per-report detail lines.

use crate::models::{AppSettings, ConnectivityReport, TransportConfig};
use crate::types::HealthCode;
use colored::Colorize;

/// Formatting options for the health summary
#[derive(Debug, Clone, Copy)]
pub struct FormattingOptions {
    /// Colorize the status indicators
    pub enable_color: bool,
    /// Include per-report detail lines
    pub verbose: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: crate::defaults::DEFAULT_ENABLE_COLOR,
            verbose: false,
        }
    }
}

/// Renders settings state into a terminal summary
pub struct SummaryFormatter {
    options: FormattingOptions,
}

impl SummaryFormatter {
    /// Create a formatter with the given options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Render the health summary for every configuration
    pub fn format_summary(&self, settings: &AppSettings) -> String {
        if settings.configs.is_empty() {
            return "No transport configurations. Add one with --add <descriptor>.".to_string();
        }

        let mut lines = Vec::new();
        for (index, config) in settings.configs.iter().enumerate() {
            lines.push(self.format_config_line(index, config));
            if self.options.verbose {
                for report in &config.test_reports {
                    lines.push(self.format_report_line(report));
                }
            }
        }
        lines.join("\n")
    }

    fn format_config_line(&self, index: usize, config: &TransportConfig) -> String {
        let descriptor = if config.transport.trim().is_empty() {
            "(direct)"
        } else {
            config.transport.as_str()
        };
        format!(
            "{} [{}] {} {}",
            self.health_indicator(config.health),
            index,
            descriptor,
            self.health_label(config.health)
        )
    }

    fn format_report_line(&self, report: &ConnectivityReport) -> String {
        let outcome = match &report.error {
            None => self.paint("ok", |s| s.green().to_string()),
            Some(error) => {
                let mut parts = Vec::new();
                if let Some(op) = &error.op {
                    parts.push(op.clone());
                }
                if let Some(posix) = &error.posix_error {
                    parts.push(posix.clone());
                }
                parts.push(error.msg.clone());
                self.paint(&parts.join(": "), |s| s.red().to_string())
            }
        };
        format!(
            "    {} {} {}ms {} {}",
            report.proto,
            report.resolver,
            report.duration_ms,
            report.time.format("%Y-%m-%dT%H:%M:%SZ"),
            outcome
        )
    }

    fn health_indicator(&self, health: HealthCode) -> String {
        let dot = "●";
        match health {
            HealthCode::AllPassed => self.paint(dot, |s| s.green().to_string()),
            HealthCode::Mixed => self.paint(dot, |s| s.yellow().to_string()),
            HealthCode::AllFailed => self.paint(dot, |s| s.red().to_string()),
            HealthCode::Unknown => self.paint(dot, |s| s.dimmed().to_string()),
        }
    }

    fn health_label(&self, health: HealthCode) -> String {
        let label = health.label();
        match health {
            HealthCode::AllPassed => self.paint(label, |s| s.green().to_string()),
            HealthCode::Mixed => self.paint(label, |s| s.yellow().to_string()),
            HealthCode::AllFailed => self.paint(label, |s| s.red().to_string()),
            HealthCode::Unknown => self.paint(label, |s| s.dimmed().to_string()),
        }
    }

    fn paint(&self, text: &str, apply: impl Fn(&str) -> String) -> String {
        if self.options.enable_color {
            apply(text)
        } else {
            text.to_string()
        }
    }
}

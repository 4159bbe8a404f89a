//! Structured logging for the transport connectivity tester
//!
//! Console logger with levels, optional color, UTC timestamps, and a
//! per-process session id so every log line of one sweep can be correlated.

use crate::error::{AppError, Result};
use chrono::Utc;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug level - detailed information for debugging
    Debug = 0,
    /// Info level - general application information
    Info = 1,
    /// Warning level - potentially harmful situations
    Warn = 2,
    /// Error level - error events but application can continue
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Console logger scoped to a named component
#[derive(Debug, Clone)]
pub struct Logger {
    /// Component name included in every line
    name: String,
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Session id correlating all lines of one process run
    session_id: Uuid,
}

impl Logger {
    /// Create a new logger for a component
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            min_level: LogLevel::Info,
            use_color: true,
            session_id: Uuid::new_v4(),
        }
    }

    /// Set the minimum level to output
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Derive a logger for a sub-component sharing this session id
    pub fn child<S: Into<String>>(&self, name: S) -> Self {
        Self {
            name: name.into(),
            min_level: self.min_level,
            use_color: self.use_color,
            session_id: self.session_id,
        }
    }

    /// Session id correlating this run's log lines
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Log a message at the given level
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        let line = self.format_line(level, message);
        if level >= LogLevel::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    /// Log at debug level
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log at info level
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log at warn level
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Log at error level
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn format_line(&self, level: LogLevel, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let session = &self.session_id.to_string()[..8];
        if self.use_color {
            format!(
                "{} {}{:5}{} [{}] [{}] {}",
                timestamp,
                level.color_code(),
                level.as_str(),
                LogLevel::reset_code(),
                session,
                self.name,
                message
            )
        } else {
            format!(
                "{} {:5} [{}] [{}] {}",
                timestamp,
                level.as_str(),
                session,
                self.name,
                message
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!(LogLevel::from_str("debug").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("WARNING").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_format_line_plain() {
        let logger = Logger::new("executor").with_color(false);
        let line = logger.format_line(LogLevel::Info, "starting sweep");
        assert!(line.contains("INFO"));
        assert!(line.contains("[executor]"));
        assert!(line.contains("starting sweep"));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_child_shares_session() {
        let parent = Logger::new("app");
        let child = parent.child("collector");
        assert_eq!(parent.session_id(), child.session_id());
    }
}

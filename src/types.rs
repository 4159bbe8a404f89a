//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Probe protocol variants: stream (TCP) and datagram (UDP)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Stream transport, DNS over TCP with length-prefixed framing
    Tcp,
    /// Datagram transport, DNS over UDP
    Udp,
}

impl Protocol {
    /// Get the wire name of this protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate health of a configuration across one test run.
///
/// Persisted as its integer value; derived from probe outcomes and
/// recomputed every run, never stored independently of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum HealthCode {
    /// No probe results available
    Unknown,
    /// Every probe succeeded
    AllPassed,
    /// Some probes succeeded, some failed
    Mixed,
    /// Every probe failed
    AllFailed,
}

impl HealthCode {
    /// Get the persisted integer value
    pub fn as_u8(&self) -> u8 {
        match self {
            HealthCode::Unknown => 0,
            HealthCode::AllPassed => 1,
            HealthCode::Mixed => 2,
            HealthCode::AllFailed => 3,
        }
    }

    /// Short status label for display
    pub fn label(&self) -> &'static str {
        match self {
            HealthCode::Unknown => "untested",
            HealthCode::AllPassed => "healthy",
            HealthCode::Mixed => "degraded",
            HealthCode::AllFailed => "unreachable",
        }
    }
}

impl Default for HealthCode {
    fn default() -> Self {
        HealthCode::Unknown
    }
}

impl From<u8> for HealthCode {
    fn from(value: u8) -> Self {
        match value {
            1 => HealthCode::AllPassed,
            2 => HealthCode::Mixed,
            3 => HealthCode::AllFailed,
            _ => HealthCode::Unknown,
        }
    }
}

impl From<HealthCode> for u8 {
    fn from(value: HealthCode) -> Self {
        value.as_u8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_wire_names() {
        assert_eq!(Protocol::Tcp.as_str(), "tcp");
        assert_eq!(Protocol::Udp.as_str(), "udp");
        assert_eq!(serde_json::to_string(&Protocol::Tcp).unwrap(), "\"tcp\"");
        assert_eq!(serde_json::from_str::<Protocol>("\"udp\"").unwrap(), Protocol::Udp);
    }

    #[test]
    fn test_health_code_round_trip() {
        for code in [
            HealthCode::Unknown,
            HealthCode::AllPassed,
            HealthCode::Mixed,
            HealthCode::AllFailed,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            let back: HealthCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, code);
        }
        assert_eq!(serde_json::to_string(&HealthCode::AllFailed).unwrap(), "3");
    }

    #[test]
    fn test_health_code_from_unknown_value() {
        assert_eq!(HealthCode::from(42), HealthCode::Unknown);
    }
}

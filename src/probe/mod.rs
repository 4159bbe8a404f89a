//! Protocol probe runner
//!
//! Executes one protocol's connectivity check against one transport
//! configuration and turns every possible outcome into a report: dialer
//! construction failures, execution failures, unreachable targets, and
//! successes all land as a `ConnectivityReport`, so a single probe can
//! never take down the surrounding run.

use crate::dns;
use crate::logging::Logger;
use crate::models::{report_timestamp, ConnectivityReport, ErrorInfo};
use crate::transport;
use crate::types::Protocol;
use std::time::Instant;

/// Run one probe and produce its report.
///
/// `transport` is the raw descriptor used for dialing; `sanitized` is the
/// credential-free form recorded in the report. The timestamp is captured
/// at probe start; `duration_ms` is measured wall-clock time, except for
/// dialer construction failures which are reported with a zero duration.
pub async fn probe(
    transport: &str,
    sanitized: &str,
    protocol: Protocol,
    resolver_address: &str,
    domain: &str,
    logger: &Logger,
) -> ConnectivityReport {
    let time = report_timestamp();
    let started = Instant::now();
    logger.debug(&format!("probing {} via {}", protocol, resolver_address));

    let outcome = match protocol {
        Protocol::Tcp => match transport::new_stream_dialer(transport) {
            Ok(dialer) => {
                dns::check_connectivity_over_stream(dialer.as_ref(), resolver_address, domain).await
            }
            Err(e) => {
                logger.warn(&format!("failed to create stream dialer: {}", e));
                return ConnectivityReport::failure(
                    resolver_address.to_string(),
                    protocol,
                    sanitized.to_string(),
                    time,
                    0,
                    ErrorInfo::from_message(e.to_string()),
                );
            }
        },
        Protocol::Udp => match transport::new_packet_dialer(transport) {
            Ok(dialer) => {
                dns::check_connectivity_over_datagram(dialer.as_ref(), resolver_address, domain)
                    .await
            }
            Err(e) => {
                logger.warn(&format!("failed to create packet dialer: {}", e));
                return ConnectivityReport::failure(
                    resolver_address.to_string(),
                    protocol,
                    sanitized.to_string(),
                    time,
                    0,
                    ErrorInfo::from_message(e.to_string()),
                );
            }
        },
    };

    let duration_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(None) => {
            logger.debug(&format!("{} probe succeeded in {}ms", protocol, duration_ms));
            ConnectivityReport::success(
                resolver_address.to_string(),
                protocol,
                sanitized.to_string(),
                time,
                duration_ms,
            )
        }
        Ok(Some(error)) => {
            logger.debug(&format!("{} probe failed: {}", protocol, error.msg));
            ConnectivityReport::failure(
                resolver_address.to_string(),
                protocol,
                sanitized.to_string(),
                time,
                duration_ms,
                error,
            )
        }
        Err(e) => {
            // The check itself could not run; record it against this probe
            // only and let the rest of the run proceed.
            logger.warn(&format!("{} connectivity check failed to run: {}", protocol, e));
            ConnectivityReport::failure(
                resolver_address.to_string(),
                protocol,
                sanitized.to_string(),
                time,
                duration_ms,
                ErrorInfo::from_message(e.to_string()),
            )
        }
    }
}

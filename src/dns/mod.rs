//! DNS-based connectivity checking over dialed transports
//!
//! The end-to-end reachability check: dial the resolver through the
//! configured transport, send one A query for the target domain, and
//! validate the response. Any well-formed response (including NXDOMAIN or
//! SERVFAIL) proves the transport can reach the resolver.
//!
//! The check distinguishes three outcomes: `Ok(None)` means connected,
//! `Ok(Some(ErrorInfo))` means the check ran but the target was unreachable
//! (with a structured cause), and `Err(_)` means the check itself could not
//! run (e.g. the domain is not a valid DNS name).

use crate::error::{AppError, Result};
use crate::models::{root_cause_message, ErrorInfo};
use crate::transport::{PacketDialer, StreamDialer};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use trust_dns_proto::op::{Message, MessageType, OpCode, Query};
use trust_dns_proto::rr::{Name, RecordType};

/// Per-query timeout enforced by the check itself; callers impose none
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest UDP response the check will accept
const MAX_UDP_PAYLOAD: usize = 4096;

/// Check connectivity to a resolver over a stream transport.
///
/// DNS over TCP with the 2-byte length prefix of RFC 1035 section 4.2.2.
pub async fn check_connectivity_over_stream(
    dialer: &dyn StreamDialer,
    resolver_address: &str,
    domain: &str,
) -> Result<Option<ErrorInfo>> {
    let (message, query_id) = build_query(domain)?;
    let wire = encode_query(&message)?;

    let exchange = async {
        let mut stream = match dialer.dial(resolver_address).await {
            Ok(stream) => stream,
            Err(e) => return Some(io_error_info("connect", &e)),
        };

        let mut framed = Vec::with_capacity(wire.len() + 2);
        framed.extend_from_slice(&(wire.len() as u16).to_be_bytes());
        framed.extend_from_slice(&wire);
        if let Err(e) = stream.write_all(&framed).await {
            return Some(io_error_info("send", &e));
        }

        let mut length = [0u8; 2];
        if let Err(e) = stream.read_exact(&mut length).await {
            return Some(io_error_info("receive", &e));
        }
        let mut body = vec![0u8; u16::from_be_bytes(length) as usize];
        if let Err(e) = stream.read_exact(&mut body).await {
            return Some(io_error_info("receive", &e));
        }

        validate_response(query_id, &body)
    };

    run_with_timeout(exchange).await
}

/// Check connectivity to a resolver over a datagram transport
pub async fn check_connectivity_over_datagram(
    dialer: &dyn PacketDialer,
    resolver_address: &str,
    domain: &str,
) -> Result<Option<ErrorInfo>> {
    let (message, query_id) = build_query(domain)?;
    let wire = encode_query(&message)?;

    let exchange = async {
        let socket = match dialer.dial(resolver_address).await {
            Ok(socket) => socket,
            Err(e) => return Some(io_error_info("connect", &e)),
        };

        if let Err(e) = socket.send(&wire).await {
            return Some(io_error_info("send", &e));
        }

        let mut buffer = vec![0u8; MAX_UDP_PAYLOAD];
        let received = match socket.recv(&mut buffer).await {
            Ok(received) => received,
            Err(e) => return Some(io_error_info("receive", &e)),
        };
        buffer.truncate(received);

        validate_response(query_id, &buffer)
    };

    run_with_timeout(exchange).await
}

async fn run_with_timeout<F>(exchange: F) -> Result<Option<ErrorInfo>>
where
    F: std::future::Future<Output = Option<ErrorInfo>>,
{
    match timeout(QUERY_TIMEOUT, exchange).await {
        Ok(outcome) => Ok(outcome),
        Err(_) => Ok(Some(ErrorInfo::new(
            Some("receive".to_string()),
            Some("ETIMEDOUT".to_string()),
            format!("connectivity check timed out after {}s", QUERY_TIMEOUT.as_secs()),
        ))),
    }
}

/// Build a recursive A query for the domain.
///
/// An invalid domain name is an execution error: the check cannot run.
fn build_query(domain: &str) -> Result<(Message, u16)> {
    let name = Name::from_utf8(domain)
        .map_err(|e| AppError::dns(format!("invalid domain name '{}': {}", domain, e)))?;

    let query_id: u16 = rand::random();
    let mut message = Message::new();
    message
        .set_id(query_id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(name, RecordType::A));

    Ok((message, query_id))
}

fn encode_query(message: &Message) -> Result<Vec<u8>> {
    message
        .to_vec()
        .map_err(|e| AppError::dns(format!("failed to encode DNS query: {}", e)))
}

/// A well-formed response with the matching id proves connectivity,
/// regardless of its response code.
fn validate_response(query_id: u16, wire: &[u8]) -> Option<ErrorInfo> {
    let response = match Message::from_vec(wire) {
        Ok(response) => response,
        Err(e) => {
            return Some(ErrorInfo::new(
                Some("receive".to_string()),
                None,
                format!("malformed DNS response: {}", e),
            ))
        }
    };

    if response.id() != query_id {
        return Some(ErrorInfo::new(
            Some("receive".to_string()),
            None,
            format!("response id {} does not match query id {}", response.id(), query_id),
        ));
    }
    if response.message_type() != MessageType::Response {
        return Some(ErrorInfo::new(
            Some("receive".to_string()),
            None,
            "resolver returned a non-response message".to_string(),
        ));
    }

    None
}

fn io_error_info(op: &str, err: &io::Error) -> ErrorInfo {
    ErrorInfo::new(
        Some(op.to_string()),
        posix_error_name(err),
        root_cause_message(err),
    )
}

/// Map an I/O error to its POSIX error name where one is identifiable
fn posix_error_name(err: &io::Error) -> Option<String> {
    use io::ErrorKind;
    let name = match err.kind() {
        ErrorKind::ConnectionRefused => "ECONNREFUSED",
        ErrorKind::ConnectionReset => "ECONNRESET",
        ErrorKind::ConnectionAborted => "ECONNABORTED",
        ErrorKind::NotConnected => "ENOTCONN",
        ErrorKind::AddrInUse => "EADDRINUSE",
        ErrorKind::AddrNotAvailable => "EADDRNOTAVAIL",
        ErrorKind::BrokenPipe => "EPIPE",
        ErrorKind::TimedOut => "ETIMEDOUT",
        ErrorKind::PermissionDenied => "EACCES",
        ErrorKind::Interrupted => "EINTR",
        _ => return None,
    };
    Some(name.to_string())
}

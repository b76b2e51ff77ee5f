//! Deadline propagation from the `grpc-timeout` request header.

use std::time::Duration;

use authn_sdk::{RequestContext, RequestHeaders};

const GRPC_TIMEOUT: &str = "grpc-timeout";

/// At most eight digits, per the gRPC over HTTP/2 wire format.
const MAX_DIGITS: usize = 8;

/// Parse a `grpc-timeout` value such as `100m` or `5S`.
#[must_use]
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    let split = value.len().checked_sub(1)?;
    let (digits, unit) = value.split_at_checked(split)?;
    if digits.is_empty() || digits.len() > MAX_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    let duration = match unit {
        "H" => Duration::from_secs(amount.checked_mul(3600)?),
        "M" => Duration::from_secs(amount.checked_mul(60)?),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };
    Some(duration)
}

/// Fresh request context, bounded by the caller's `grpc-timeout` if present.
#[must_use]
pub fn base_context(headers: &RequestHeaders) -> RequestContext {
    let ctx = RequestContext::new();
    let Some(value) = headers.first(GRPC_TIMEOUT) else {
        return ctx;
    };
    if let Some(timeout) = parse_grpc_timeout(value) {
        ctx.with_timeout(timeout)
    } else {
        tracing::debug!(value, "Ignoring malformed grpc-timeout");
        ctx
    }
}

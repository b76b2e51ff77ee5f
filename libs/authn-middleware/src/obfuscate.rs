//! Error disclosure policy applied at the interceptor boundary.

use authn_sdk::AuthError;
use tonic::{Code, Status};

/// Message returned in place of infrastructure fault details.
pub const UNAVAILABLE_MESSAGE: &str = "authentication service unavailable, retry later";

/// Whether `code` points at a fault in the authentication backend rather
/// than at the caller.
#[must_use]
pub fn is_infrastructure_fault(code: Code) -> bool {
    matches!(code, Code::Internal | Code::Unavailable | Code::Unknown)
}

/// Convert an authentication failure into the status shown to the caller.
///
/// Infrastructure faults keep their code but lose their message. Other
/// statuses pass through verbatim. Errors without a status become
/// `Unauthenticated`.
#[must_use]
pub fn obfuscate(err: &AuthError) -> Status {
    match err {
        AuthError::Status(status) if is_infrastructure_fault(status.code()) => {
            Status::new(status.code(), UNAVAILABLE_MESSAGE)
        }
        AuthError::Status(status) => Status::new(status.code(), status.message()),
        AuthError::Other(message) => Status::unauthenticated(format!("authentication: {message}")),
    }
}

/// Log a failed authentication once, before it is obfuscated.
pub fn log_auth_failure(path: &str, err: &AuthError) {
    match err.status() {
        Some(status) if is_infrastructure_fault(status.code()) => {
            tracing::warn!(
                path,
                code = ?status.code(),
                error = %status.message(),
                "Authentication backend failure"
            );
        }
        Some(status) => {
            tracing::debug!(path, code = ?status.code(), error = %status.message(), "Authentication rejected");
        }
        None => tracing::debug!(path, error = %err, "Authentication rejected"),
    }
}

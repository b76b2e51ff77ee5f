//! Error types for pluggable authentication.

use authn_context::ContextError;
use thiserror::Error;

/// Errors returned by [`Authenticator::authenticate`](crate::Authenticator::authenticate).
///
/// Backends return precise errors; disguising infrastructure failures is left
/// to the interceptor that talks to the caller.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Failure classified with an RPC status code.
    #[error(transparent)]
    Status(#[from] tonic::Status),

    /// Failure without any status code.
    #[error("{0}")]
    Other(String),
}

impl AuthError {
    /// Shorthand for an explicit rejection of the caller's credentials.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Status(tonic::Status::unauthenticated(message))
    }

    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// The status code attached to this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            Self::Status(status) => Some(status),
            Self::Other(_) => None,
        }
    }
}

impl From<ContextError> for AuthError {
    fn from(e: ContextError) -> Self {
        match e {
            ContextError::Canceled => Self::Status(tonic::Status::cancelled(e.to_string())),
            ContextError::DeadlineExceeded => {
                Self::Status(tonic::Status::deadline_exceeded(e.to_string()))
            }
        }
    }
}

/// Errors raised while turning a configuration string into an authenticator.
///
/// All variants are startup failures: the service should not begin serving
/// traffic when one is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration string is not a valid URL.
    #[error("invalid authenticator config URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No factory is registered for the URL scheme.
    #[error("no authenticator plugin named \"{scheme}\" is currently registered")]
    UnknownScheme { scheme: String },

    /// The factory for the scheme failed to build the authenticator.
    #[error("failed to construct \"{scheme}\" authenticator: {source:#}")]
    Construction {
        scheme: String,
        #[source]
        source: anyhow::Error,
    },
}

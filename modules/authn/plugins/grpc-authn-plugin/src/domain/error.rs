//! Setup errors for the remote gRPC authenticator.

use thiserror::Error;

/// Failures while building a [`RemoteAuthenticator`](super::RemoteAuthenticator)
/// from its configuration URL.
#[derive(Debug, Error)]
pub enum RemoteSetupError {
    #[error("invalid config URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("config URL has no host")]
    MissingHost,

    #[error("invalid value for '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("unknown config parameter '{0}'")]
    UnknownParameter(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] tonic::transport::Error),

    #[error("the gRPC channel must be created inside a tokio runtime")]
    NoRuntime,
}

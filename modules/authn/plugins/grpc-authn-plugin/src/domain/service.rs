//! Remote authenticator service.

use std::sync::Arc;

use authn_sdk::{RequestHeaders, TrustedHeaders};
use tonic::transport::Endpoint;

use super::api::{AuthenticationApi, HealthApi};
use super::error::RemoteSetupError;
use crate::config::RemoteConfig;
use crate::infra::{GrpcAuthenticationApi, GrpcHealthApi};
use crate::pb::{AuthRequest, AuthResponse, Header};

/// Authenticator delegating every trust decision to a remote service.
///
/// Holds independent handles for authentication and health checks; both are
/// safe to call concurrently from any number of requests.
pub struct RemoteAuthenticator {
    pub(super) auth: Arc<dyn AuthenticationApi>,
    pub(super) health: Arc<dyn HealthApi>,
}

impl RemoteAuthenticator {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthenticationApi>, health: Arc<dyn HealthApi>) -> Self {
        Self { auth, health }
    }

    /// Create an authenticator backed by a lazily connected gRPC channel.
    ///
    /// No connection is attempted here; the first call dials the target.
    ///
    /// # Errors
    ///
    /// - `InvalidEndpoint` if the target is not a valid URI
    /// - `NoRuntime` when called outside a tokio runtime
    pub fn connect(cfg: &RemoteConfig) -> Result<Self, RemoteSetupError> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(RemoteSetupError::NoRuntime);
        }

        let mut endpoint = Endpoint::from_shared(cfg.endpoint_uri())?;
        if let Some(connect_timeout) = cfg.connect_timeout {
            endpoint = endpoint.connect_timeout(connect_timeout);
        }
        if let Some(timeout) = cfg.timeout {
            endpoint = endpoint.timeout(timeout);
        }
        let channel = endpoint.connect_lazy();

        tracing::debug!(target_addr = %cfg.target, "Lazy gRPC channel created");

        Ok(Self::new(
            Arc::new(GrpcAuthenticationApi::new(channel.clone())),
            Arc::new(GrpcHealthApi::new(channel)),
        ))
    }

    /// Build the wire request: header names are lower-cased and every value
    /// of a multi-valued header becomes its own pair.
    #[must_use]
    pub fn build_request(path: &str, headers: &RequestHeaders, ip: &str) -> AuthRequest {
        AuthRequest {
            url: path.to_owned(),
            ip: ip.to_owned(),
            headers: headers
                .pairs()
                .map(|(key, value)| Header {
                    key: key.to_lowercase(),
                    value: value.to_owned(),
                })
                .collect(),
        }
    }

    /// Fold the backend response into trusted headers, last value winning
    /// for names that repeat.
    #[must_use]
    pub fn trusted_headers(response: AuthResponse) -> TrustedHeaders {
        response
            .authenticated_headers
            .into_iter()
            .map(|header| (header.key, header.value))
            .collect()
    }
}

//! Ports to the remote authentication backend.
//!
//! The authenticator talks to the backend through these traits. The tonic
//! implementations live in [`crate::infra`].

use async_trait::async_trait;
use tonic_health::pb::health_check_response::ServingStatus;

use crate::pb::{AuthRequest, AuthResponse};

/// Handle to the `Authentication` service.
#[async_trait]
pub trait AuthenticationApi: Send + Sync {
    /// Forward an authentication request.
    ///
    /// # Errors
    ///
    /// Returns the RPC status reported by the transport or the backend.
    async fn authenticate(
        &self,
        request: tonic::Request<AuthRequest>,
    ) -> Result<AuthResponse, tonic::Status>;
}

/// Handle to the backend's health service.
#[async_trait]
pub trait HealthApi: Send + Sync {
    /// Query the serving status of the backend.
    ///
    /// # Errors
    ///
    /// Returns the RPC status when the check itself fails.
    async fn check(&self) -> Result<ServingStatus, tonic::Status>;
}

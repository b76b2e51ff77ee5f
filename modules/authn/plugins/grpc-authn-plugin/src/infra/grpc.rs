//! gRPC clients for the authentication backend.
//!
//! Both clients share one lazily connected [`Channel`]; cloning a tonic
//! client is cheap and gives each call its own request slot.

use async_trait::async_trait;
use tonic::transport::Channel;
use tonic_health::pb::HealthCheckRequest;
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;

use crate::domain::{AuthenticationApi, HealthApi};
use crate::pb::{AuthRequest, AuthResponse, AuthenticationClient};

/// [`AuthenticationApi`] over `sf.authentication.v1.Authentication`.
#[derive(Debug, Clone)]
pub struct GrpcAuthenticationApi {
    client: AuthenticationClient,
}

impl GrpcAuthenticationApi {
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            client: AuthenticationClient::new(channel),
        }
    }
}

#[async_trait]
impl AuthenticationApi for GrpcAuthenticationApi {
    async fn authenticate(
        &self,
        request: tonic::Request<AuthRequest>,
    ) -> Result<AuthResponse, tonic::Status> {
        let mut client = self.client.clone();
        let response = client.authenticate(request).await?;
        Ok(response.into_inner())
    }
}

/// [`HealthApi`] over `grpc.health.v1.Health`, checking overall server health.
#[derive(Debug, Clone)]
pub struct GrpcHealthApi {
    client: HealthClient<Channel>,
}

impl GrpcHealthApi {
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            client: HealthClient::new(channel),
        }
    }
}

#[async_trait]
impl HealthApi for GrpcHealthApi {
    async fn check(&self) -> Result<ServingStatus, tonic::Status> {
        let mut client = self.client.clone();
        let response = client
            .check(HealthCheckRequest {
                service: String::new(),
            })
            .await?;
        Ok(response.into_inner().status())
    }
}

//! Wire types and client for `sf.authentication.v1.Authentication`.
//!
//! Mirrors `proto/sf/authentication/v1/authentication.proto`.

use tonic::transport::Channel;

#[derive(Clone, PartialEq, Eq, Hash, prost::Message)]
pub struct Header {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, Eq, Hash, prost::Message)]
pub struct AuthRequest {
    #[prost(string, tag = "1")]
    pub url: String,
    #[prost(string, tag = "2")]
    pub ip: String,
    #[prost(message, repeated, tag = "3")]
    pub headers: Vec<Header>,
}

#[derive(Clone, PartialEq, Eq, Hash, prost::Message)]
pub struct AuthResponse {
    #[prost(message, repeated, tag = "1")]
    pub authenticated_headers: Vec<Header>,
}

pub const SERVICE_NAME: &str = "sf.authentication.v1.Authentication";
pub const AUTHENTICATE_PATH: &str = "/sf.authentication.v1.Authentication/Authenticate";

/// Client for the `Authentication` service.
#[derive(Debug, Clone)]
pub struct AuthenticationClient {
    inner: tonic::client::Grpc<Channel>,
}

impl AuthenticationClient {
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    /// Call `Authenticate`.
    ///
    /// # Errors
    ///
    /// Returns the RPC status when the transport or the server fails.
    pub async fn authenticate(
        &mut self,
        request: impl tonic::IntoRequest<AuthRequest>,
    ) -> Result<tonic::Response<AuthResponse>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unavailable(format!("service was not ready: {e}")))?;
        let codec = tonic_prost::ProstCodec::default();
        let path = http::uri::PathAndQuery::from_static(AUTHENTICATE_PATH);
        self.inner.unary(request.into_request(), path, codec).await
    }
}

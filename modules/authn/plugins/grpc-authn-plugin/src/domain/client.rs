//! `Authenticator` implementation backed by the remote service.

use async_trait::async_trait;
use authn_sdk::{AuthError, Authenticator, RequestContext, RequestHeaders};
use tonic_health::pb::health_check_response::ServingStatus;

use super::service::RemoteAuthenticator;

#[async_trait]
impl Authenticator for RemoteAuthenticator {
    #[tracing::instrument(skip_all, fields(path = %path))]
    async fn authenticate(
        &self,
        ctx: &RequestContext,
        path: &str,
        headers: &RequestHeaders,
        ip: &str,
    ) -> Result<RequestContext, AuthError> {
        let mut request = tonic::Request::new(Self::build_request(path, headers, ip));
        if let Some(remaining) = ctx.remaining() {
            request.set_timeout(remaining);
        }

        let response = ctx.run(self.auth.authenticate(request)).await??;
        tracing::trace!(
            headers = response.authenticated_headers.len(),
            "Remote authentication succeeded"
        );

        Ok(ctx.with_trusted_headers(Self::trusted_headers(response)))
    }

    async fn ready(&self, ctx: &RequestContext) -> bool {
        match ctx.run(self.health.check()).await {
            Ok(Ok(ServingStatus::Serving)) => true,
            Ok(Ok(status)) => {
                tracing::debug!(status = status.as_str_name(), "Authentication backend not serving");
                false
            }
            Ok(Err(status)) => {
                tracing::debug!(code = ?status.code(), error = %status.message(), "Health check failed");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "Health check aborted");
                false
            }
        }
    }
}

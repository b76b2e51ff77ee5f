//! `Authenticator` implementation for the trust plugin.

use async_trait::async_trait;
use authn_sdk::{AuthError, Authenticator, RequestContext, RequestHeaders};

use super::service::Service;

#[async_trait]
impl Authenticator for Service {
    async fn authenticate(
        &self,
        ctx: &RequestContext,
        path: &str,
        headers: &RequestHeaders,
        ip: &str,
    ) -> Result<RequestContext, AuthError> {
        tracing::trace!(path, ip, "Trusting inbound headers");
        Ok(ctx.with_trusted_headers(Service::trusted_headers(headers)))
    }

    async fn ready(&self, _ctx: &RequestContext) -> bool {
        true
    }
}

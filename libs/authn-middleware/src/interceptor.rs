//! Unary and streaming gRPC interceptors.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use authn_sdk::{Authenticator, RequestContext, RequestHeaders};
use tonic::Status;

use crate::deadline::base_context;
use crate::layer::{AuthLayer, Grpc, Http};
use crate::obfuscate::{log_auth_failure, obfuscate};
use crate::real_ip::real_ip;
use crate::stream::{AuthenticatedServerStream, ServerStream};

/// Description of the unary call being intercepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryServerInfo {
    /// Full RPC method path, e.g. `/users.v1.Users/Get`.
    pub full_method: String,
}

impl UnaryServerInfo {
    #[must_use]
    pub fn new(full_method: impl Into<String>) -> Self {
        Self {
            full_method: full_method.into(),
        }
    }
}

/// Description of the streaming call being intercepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamServerInfo {
    /// Full RPC method path, e.g. `/chat.v1.Chat/Connect`.
    pub full_method: String,
}

impl StreamServerInfo {
    #[must_use]
    pub fn new(full_method: impl Into<String>) -> Self {
        Self {
            full_method: full_method.into(),
        }
    }
}

/// Authenticate one request: derive the client IP, ask `authenticator`
/// and obfuscate any failure before it reaches the caller.
///
/// # Errors
///
/// Returns the obfuscated status when authentication fails.
#[tracing::instrument(skip_all, fields(path = %path))]
pub async fn authenticate_request(
    authenticator: &dyn Authenticator,
    ctx: &RequestContext,
    path: &str,
    headers: &RequestHeaders,
    peer: Option<SocketAddr>,
) -> Result<RequestContext, Status> {
    let peer = peer.as_ref().map(ToString::to_string).unwrap_or_default();
    let ip = real_ip(headers, &peer);

    match authenticator.authenticate(ctx, path, headers, &ip).await {
        Ok(ctx) => {
            tracing::trace!(ip = %ip, "Request authenticated");
            Ok(ctx)
        }
        Err(err) => {
            log_auth_failure(path, &err);
            Err(obfuscate(&err))
        }
    }
}

/// Authenticates calls before handing them to the real handler.
///
/// ```ignore
/// let auth = AuthInterceptor::new(authenticator);
///
/// // unary
/// auth.unary(&UnaryServerInfo::new("/users.v1.Users/Get"), request, |ctx, req| {
///     handle_get(ctx, req)
/// })
/// .await
///
/// // axum
/// Router::new().route("/me", get(me)).layer(auth.layer_http());
/// ```
#[derive(Clone)]
pub struct AuthInterceptor {
    authenticator: Arc<dyn Authenticator>,
}

impl AuthInterceptor {
    #[must_use]
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Authenticate a unary call and run `handler` with the derived context.
    ///
    /// The context is also inserted into the request extensions. On failure
    /// `handler` is never called.
    ///
    /// # Errors
    ///
    /// Returns the obfuscated authentication status, or the handler's error.
    pub async fn unary<T, R, F, Fut>(
        &self,
        info: &UnaryServerInfo,
        mut request: tonic::Request<T>,
        handler: F,
    ) -> Result<tonic::Response<R>, Status>
    where
        F: FnOnce(RequestContext, tonic::Request<T>) -> Fut,
        Fut: Future<Output = Result<tonic::Response<R>, Status>>,
    {
        let headers = RequestHeaders::from(request.metadata());
        let base = base_context(&headers);

        let ctx = authenticate_request(
            self.authenticator.as_ref(),
            &base,
            &info.full_method,
            &headers,
            request.remote_addr(),
        )
        .await?;

        request.extensions_mut().insert(ctx.clone());
        handler(ctx, request).await
    }

    /// Authenticate a streaming call and run `handler` with a stream whose
    /// context is the authenticated one.
    ///
    /// On failure `handler` is never called.
    ///
    /// # Errors
    ///
    /// Returns the obfuscated authentication status, or the handler's error.
    pub async fn stream<S, R, F, Fut>(
        &self,
        info: &StreamServerInfo,
        stream: S,
        handler: F,
    ) -> Result<R, Status>
    where
        S: ServerStream,
        F: FnOnce(AuthenticatedServerStream<S>) -> Fut,
        Fut: Future<Output = Result<R, Status>>,
    {
        let headers = RequestHeaders::from(stream.metadata());

        let ctx = authenticate_request(
            self.authenticator.as_ref(),
            stream.context(),
            &info.full_method,
            &headers,
            stream.remote_addr(),
        )
        .await?;

        handler(AuthenticatedServerStream::new(stream, ctx)).await
    }

    /// Tower layer for axum routers; failures render as problem JSON.
    #[must_use]
    pub fn layer_http(&self) -> AuthLayer<Http> {
        AuthLayer::http(self.authenticator.clone())
    }

    /// Tower layer for tonic servers; failures render as gRPC statuses.
    #[must_use]
    pub fn layer_grpc(&self) -> AuthLayer<Grpc> {
        AuthLayer::grpc(self.authenticator.clone())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use authn_sdk::{AuthError, TrustedHeaders};
    use tonic::Code;
    use tonic::metadata::MetadataValue;

    use super::*;

    /// Echoes the derived client IP as `x-ip`.
    struct EchoIp;

    #[async_trait]
    impl Authenticator for EchoIp {
        async fn authenticate(
            &self,
            ctx: &RequestContext,
            _path: &str,
            _headers: &RequestHeaders,
            ip: &str,
        ) -> Result<RequestContext, AuthError> {
            let mut trusted = TrustedHeaders::new();
            trusted.set("x-ip", ip);
            Ok(ctx.with_trusted_headers(trusted))
        }

        async fn ready(&self, _ctx: &RequestContext) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn forwarded_for_reaches_authenticator() {
        let mut headers = RequestHeaders::new();
        headers.append("X-Forwarded-For", "203.0.113.7, 10.0.0.1");

        let ctx = authenticate_request(
            &EchoIp,
            &RequestContext::new(),
            "/svc/Method",
            &headers,
            Some("10.0.0.9:5000".parse().unwrap()),
        )
        .await
        .unwrap();

        assert_eq!(ctx.trusted_headers().get("x-ip"), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn peer_without_port_is_used_as_fallback() {
        let ctx = authenticate_request(
            &EchoIp,
            &RequestContext::new(),
            "/svc/Method",
            &RequestHeaders::new(),
            Some("10.0.0.9:5000".parse().unwrap()),
        )
        .await
        .unwrap();

        assert_eq!(ctx.trusted_headers().get("x-ip"), Some("10.0.0.9"));
    }

    #[tokio::test]
    async fn unary_inserts_context_into_extensions() {
        let auth = AuthInterceptor::new(Arc::new(EchoIp));
        let mut request = tonic::Request::new(());
        request
            .metadata_mut()
            .insert("x-real-ip", MetadataValue::from_static("198.51.100.2"));

        let response = auth
            .unary(&UnaryServerInfo::new("/svc/Method"), request, |ctx, req| async move {
                let from_extensions = req.extensions().get::<RequestContext>().unwrap();
                assert_eq!(
                    from_extensions.trusted_headers().get("x-ip"),
                    ctx.trusted_headers().get("x-ip")
                );
                Ok(tonic::Response::new(ctx.trusted_headers().get("x-ip").map(str::to_owned)))
            })
            .await
            .unwrap();

        assert_eq!(response.into_inner().as_deref(), Some("198.51.100.2"));
    }

    #[tokio::test]
    async fn unary_propagates_handler_error() {
        let auth = AuthInterceptor::new(Arc::new(EchoIp));

        let err = auth
            .unary(
                &UnaryServerInfo::new("/svc/Method"),
                tonic::Request::new(()),
                |_ctx, _req| async { Err::<tonic::Response<()>, _>(Status::not_found("no such user")) },
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), Code::NotFound);
        assert_eq!(err.message(), "no such user");
    }
}

//! Tower layer authenticating HTTP requests, for axum routers and tonic
//! servers alike.

use std::marker::PhantomData;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};

use authn_sdk::{Authenticator, RequestContext, RequestHeaders};
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use http::{Extensions, Request};
use tonic::Status;
use tonic::transport::server::TcpConnectInfo;
use tower::{Layer, Service};

use crate::deadline::base_context;
use crate::interceptor::authenticate_request;
use crate::problem::Problem;

/// Rejections render as RFC 9457 problem JSON.
#[derive(Debug, Clone, Copy)]
pub struct Http;

/// Rejections render as trailers-only gRPC responses.
#[derive(Debug, Clone, Copy)]
pub struct Grpc;

/// Layer that authenticates every request before the inner service sees it.
///
/// On success the derived [`RequestContext`] is inserted into the request
/// extensions. On failure the inner service is not called.
///
/// # Example
/// ```ignore
/// let router = Router::new()
///     .route("/me", get(me))
///     .layer(AuthLayer::http(authenticator.clone()));
///
/// Server::builder()
///     .layer(AuthLayer::grpc(authenticator))
///     .add_service(users_server);
/// ```
pub struct AuthLayer<M> {
    authenticator: Arc<dyn Authenticator>,
    _mode: PhantomData<M>,
}

impl<M> Clone for AuthLayer<M> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
            _mode: PhantomData,
        }
    }
}

impl AuthLayer<Http> {
    #[must_use]
    pub fn http(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            _mode: PhantomData,
        }
    }
}

impl AuthLayer<Grpc> {
    #[must_use]
    pub fn grpc(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            _mode: PhantomData,
        }
    }
}

impl<S, M> Layer<S> for AuthLayer<M> {
    type Service = AuthService<S, M>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            authenticator: self.authenticator.clone(),
            _mode: PhantomData,
        }
    }
}

/// Service produced by [`AuthLayer`].
pub struct AuthService<S, M> {
    inner: S,
    authenticator: Arc<dyn Authenticator>,
    _mode: PhantomData<M>,
}

impl<S: Clone, M> Clone for AuthService<S, M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            authenticator: self.authenticator.clone(),
            _mode: PhantomData,
        }
    }
}

impl<S, M> AuthService<S, M>
where
    S: Clone,
{
    /// Take the service that was driven to readiness, leaving a clone behind.
    fn take_ready_inner(&mut self) -> S {
        let not_ready_inner = self.inner.clone();
        std::mem::replace(&mut self.inner, not_ready_inner)
    }
}

impl<S> Service<Request<Body>> for AuthService<S, Http>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        let mut ready_inner = self.take_ready_inner();

        Box::pin(async move {
            match authenticate_http(authenticator.as_ref(), request, &RequestContext::new()).await {
                Ok(request) => ready_inner.call(request).await,
                Err(status) => Ok(Problem::from_status(&status).into_response()),
            }
        })
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AuthService<S, Grpc>
where
    S: Service<Request<ReqBody>, Response = http::Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Default,
{
    type Response = http::Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let authenticator = self.authenticator.clone();
        let mut ready_inner = self.take_ready_inner();

        Box::pin(async move {
            let base = base_context(&RequestHeaders::from(request.headers()));
            match authenticate_http(authenticator.as_ref(), request, &base).await {
                Ok(request) => ready_inner.call(request).await,
                Err(status) => Ok(status.into_http()),
            }
        })
    }
}

async fn authenticate_http<B>(
    authenticator: &dyn Authenticator,
    mut request: Request<B>,
    base: &RequestContext,
) -> Result<Request<B>, Status> {
    let headers = RequestHeaders::from(request.headers());
    let peer = peer_addr(request.extensions());
    let path = request.uri().path().to_owned();

    let ctx = authenticate_request(authenticator, base, &path, &headers, peer).await?;

    request.extensions_mut().insert(ctx);
    Ok(request)
}

/// Transport peer as recorded by axum (`into_make_service_with_connect_info`)
/// or by the tonic server.
fn peer_addr(extensions: &Extensions) -> Option<SocketAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
        .or_else(|| {
            extensions
                .get::<TcpConnectInfo>()
                .and_then(TcpConnectInfo::remote_addr)
        })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn peer_prefers_axum_connect_info() {
        let mut extensions = Extensions::new();
        assert_eq!(peer_addr(&extensions), None);

        let addr: SocketAddr = "10.0.0.5:4000".parse().unwrap();
        extensions.insert(ConnectInfo(addr));
        assert_eq!(peer_addr(&extensions), Some(addr));
    }
}

//! Server-side stream abstraction for streaming interceptors.

use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};

use authn_sdk::{RequestContext, RequestHeaders};
use futures::Stream;
use pin_project_lite::pin_project;
use tonic::metadata::MetadataMap;

use crate::deadline::base_context;

/// A server-side stream of inbound messages together with the call's
/// metadata and execution context.
pub trait ServerStream {
    /// Execution context of the call.
    fn context(&self) -> &RequestContext;

    /// Request metadata received with the call.
    fn metadata(&self) -> &MetadataMap;

    /// Transport peer, when known.
    fn remote_addr(&self) -> Option<SocketAddr>;
}

pin_project! {
    /// Adapts a tonic streaming request (e.g. `tonic::Request<Streaming<T>>`)
    /// into a [`ServerStream`].
    pub struct GrpcServerStream<S> {
        #[pin]
        inner: S,
        metadata: MetadataMap,
        remote_addr: Option<SocketAddr>,
        context: RequestContext,
    }
}

impl<S> GrpcServerStream<S> {
    /// The base context is bounded by the caller's `grpc-timeout`.
    #[must_use]
    pub fn new(request: tonic::Request<S>) -> Self {
        let remote_addr = request.remote_addr();
        let (metadata, _extensions, inner) = request.into_parts();
        let context = base_context(&RequestHeaders::from(&metadata));
        Self {
            inner,
            metadata,
            remote_addr,
            context,
        }
    }

    /// Replace the base context, e.g. to tie it to a server shutdown token.
    #[must_use]
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> ServerStream for GrpcServerStream<S> {
    fn context(&self) -> &RequestContext {
        &self.context
    }

    fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}

impl<S: Stream> Stream for GrpcServerStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pin_project! {
    /// A [`ServerStream`] whose context is the authenticated one.
    ///
    /// Everything except [`ServerStream::context`] is delegated to the
    /// wrapped stream.
    pub struct AuthenticatedServerStream<S> {
        #[pin]
        inner: S,
        context: RequestContext,
    }
}

impl<S> AuthenticatedServerStream<S> {
    pub(crate) fn new(inner: S, context: RequestContext) -> Self {
        Self { inner, context }
    }

    #[must_use]
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ServerStream> ServerStream for AuthenticatedServerStream<S> {
    fn context(&self) -> &RequestContext {
        &self.context
    }

    fn metadata(&self) -> &MetadataMap {
        self.inner.metadata()
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.inner.remote_addr()
    }
}

impl<S: Stream> Stream for AuthenticatedServerStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

//! Capability trait for authenticator backends.
//!
//! Interceptors call this trait before running a request handler. Each backend
//! (local stub, remote service, third-party plugin) is a separate type
//! registered under its own scheme in the [`Registry`](crate::Registry).

use async_trait::async_trait;
use authn_context::RequestContext;

use crate::error::AuthError;
use crate::headers::RequestHeaders;

/// Decides, per request, whether and under which trusted identity a request
/// may proceed.
///
/// Implementations are shared across all in-flight requests and must not keep
/// mutable per-call state.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate a request and return a context derived from `ctx` that
    /// carries the resulting [`TrustedHeaders`](authn_context::TrustedHeaders).
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context of the inbound request; its cancellation and deadline
    ///   govern any remote call made here
    /// * `path` - Logical path or full RPC method name of the request
    /// * `headers` - Inbound request headers, names in the caller's spelling
    /// * `ip` - Client IP address, already resolved by the interceptor
    ///
    /// # Errors
    ///
    /// - `AuthError::Status` when the backend rejected the request or failed
    ///   with a classified status
    /// - `AuthError::Other` for failures carrying no status code
    async fn authenticate(
        &self,
        ctx: &RequestContext,
        path: &str,
        headers: &RequestHeaders,
        ip: &str,
    ) -> Result<RequestContext, AuthError>;

    /// Report whether the backend can currently serve authentication calls.
    ///
    /// Failures collapse to `false`; this never returns an error.
    async fn ready(&self, ctx: &RequestContext) -> bool;
}

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Request-scoped authentication context.
//!
//! - [`TrustedHeaders`] - case-insensitive set of header facts produced by an authenticator
//! - [`RequestContext`] - per-request execution context carrying the trusted headers,
//!   a deadline and a cancellation token

pub mod context;
pub mod trusted_headers;

pub use context::{ContextError, RequestContext};
pub use trusted_headers::TrustedHeaders;

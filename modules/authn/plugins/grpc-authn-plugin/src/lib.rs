#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Remote gRPC `AuthN` Plugin
//!
//! Registers the `grpc` scheme. The authenticator forwards the request path,
//! client IP and headers to an external `sf.authentication.v1.Authentication`
//! service and attaches the headers it returns as trusted headers.
//! Readiness is reported by the standard `grpc.health.v1.Health` service of
//! the same backend.
//!
//! ## Configuration
//!
//! ```yaml
//! authenticator: "grpc://auth.internal:9000?connect_timeout=2s&timeout=5s"
//! ```
//!
//! Host, port and path (scheme stripped) form the target address.
//! The connection is established lazily on the first call.

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;
pub mod pb;

pub use config::RemoteConfig;
pub use domain::{AuthenticationApi, HealthApi, RemoteAuthenticator, RemoteSetupError};
pub use module::{SCHEME, register, register_as};

//! `AuthN` SDK
//!
//! This crate provides the public API shared by authenticator plugins and the
//! request interceptors:
//!
//! - [`Authenticator`] - Capability trait every backend implements
//! - [`Registry`] - Scheme name to factory mapping, resolved from a config URL
//! - [`RequestHeaders`] - Transport-neutral inbound header collection
//! - [`AuthError`], [`ConfigError`] - Error types
//! - [`AuthNConfig`] - Configuration section selecting the authenticator
//!
//! ## Usage
//!
//! ```ignore
//! use authn_sdk::Registry;
//!
//! let registry = Registry::global();
//! trust_authn_plugin::register(registry);
//! grpc_authn_plugin::register(registry);
//!
//! let authenticator = registry.resolve("grpc://auth.internal:9000")?;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod error;
pub mod headers;
pub mod registry;

// Re-export main types at crate root
pub use api::Authenticator;
pub use authn_context::{ContextError, RequestContext, TrustedHeaders};
pub use config::AuthNConfig;
pub use error::{AuthError, ConfigError};
pub use headers::RequestHeaders;
pub use registry::{AuthenticatorFactory, Registry, new_authenticator, register};

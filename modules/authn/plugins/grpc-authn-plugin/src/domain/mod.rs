//! Domain layer for the remote gRPC authenticator.

pub mod api;
pub mod client;
pub mod error;
pub mod service;

pub use api::{AuthenticationApi, HealthApi};
pub use error::RemoteSetupError;
pub use service::RemoteAuthenticator;

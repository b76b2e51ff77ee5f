//! Registration of the remote gRPC plugin.

use std::sync::Arc;

use authn_sdk::{Authenticator, Registry};

use crate::config::RemoteConfig;
use crate::domain::RemoteAuthenticator;

/// Default scheme selecting this plugin in a configuration URL.
pub const SCHEME: &str = "grpc";

/// Register the plugin under [`SCHEME`].
pub fn register(registry: &Registry) {
    register_as(registry, SCHEME);
}

/// Register the plugin under a custom `scheme`, e.g. `grpcauth`.
///
/// The factory must be invoked from within a tokio runtime.
pub fn register_as(registry: &Registry, scheme: &str) {
    registry.register(scheme, |config| {
        let cfg = RemoteConfig::from_url(config)?;
        tracing::info!(
            target_addr = %cfg.target,
            connect_timeout = ?cfg.connect_timeout,
            timeout = ?cfg.timeout,
            "Remote gRPC authenticator configured"
        );
        let authenticator: Arc<dyn Authenticator> = Arc::new(RemoteAuthenticator::connect(&cfg)?);
        Ok(authenticator)
    });
}

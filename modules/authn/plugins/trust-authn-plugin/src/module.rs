//! Registration of the trust plugin.

use std::sync::Arc;

use authn_sdk::{Authenticator, Registry};

use crate::domain::Service;

/// Scheme selecting this plugin in a configuration URL.
pub const SCHEME: &str = "trust";

/// Register the `trust` scheme in `registry`.
pub fn register(registry: &Registry) {
    registry.register(SCHEME, |_config| {
        tracing::warn!(
            "Trust AuthN plugin selected: inbound headers are trusted as-is. \
             Do NOT use this plugin in production."
        );
        let authenticator: Arc<dyn Authenticator> = Arc::new(Service::new());
        Ok(authenticator)
    });
}

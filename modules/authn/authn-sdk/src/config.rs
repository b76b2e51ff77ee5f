//! Configuration for request authentication.

use std::path::Path;
use std::sync::Arc;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::api::Authenticator;
use crate::error::ConfigError;
use crate::registry::Registry;

/// Environment variable prefix, e.g. `AUTHN_AUTHENTICATOR=grpc://auth:9000`.
pub const ENV_PREFIX: &str = "AUTHN_";

/// Configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthNConfig {
    /// Authenticator configuration URL.
    ///
    /// The URL scheme selects the registered plugin (`trust`, `grpc`, ...);
    /// the remaining components are plugin-specific.
    pub authenticator: String,
}

impl Default for AuthNConfig {
    fn default() -> Self {
        Self {
            authenticator: "trust://".to_owned(),
        }
    }
}

impl AuthNConfig {
    /// Layered configuration sources: defaults, then the YAML file at
    /// `path` (if present), then `AUTHN_*` environment variables.
    #[must_use]
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load the configuration from [`AuthNConfig::figment`].
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or holds unknown keys.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let cfg: Self = Self::figment(path).extract()?;
        Ok(cfg)
    }

    /// Resolve the configured authenticator in `registry`.
    ///
    /// # Errors
    ///
    /// See [`Registry::resolve`].
    pub fn build(&self, registry: &Registry) -> Result<Arc<dyn Authenticator>, ConfigError> {
        registry.resolve(&self.authenticator)
    }
}

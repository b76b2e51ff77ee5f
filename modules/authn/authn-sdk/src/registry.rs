//! Scheme-keyed registry of authenticator factories.
//!
//! Plugins register a factory under a URL scheme during startup. A
//! configuration URL is then resolved to a live authenticator by its scheme:
//!
//! ```ignore
//! let registry = Registry::new();
//! trust_authn_plugin::register(&registry);
//! let authenticator = registry.resolve("trust://")?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use url::Url;

use crate::api::Authenticator;
use crate::error::ConfigError;

/// Builds an authenticator from the full configuration URL.
pub type AuthenticatorFactory =
    Arc<dyn Fn(&str) -> anyhow::Result<Arc<dyn Authenticator>> + Send + Sync>;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Mapping from scheme name to [`AuthenticatorFactory`].
///
/// Registration is expected to finish during startup, before requests are
/// served. Lookups take a read lock, so the registry stays safe to use even
/// when that ordering is not guaranteed.
#[derive(Default)]
pub struct Registry {
    factories: RwLock<HashMap<String, AuthenticatorFactory>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Register `factory` under `scheme`.
    ///
    /// Schemes are case-insensitive. Registering a scheme again replaces the
    /// previous factory.
    pub fn register<F>(&self, scheme: &str, factory: F)
    where
        F: Fn(&str) -> anyhow::Result<Arc<dyn Authenticator>> + Send + Sync + 'static,
    {
        let scheme = scheme.to_ascii_lowercase();
        let replaced = self
            .factories
            .write()
            .insert(scheme.clone(), Arc::new(factory))
            .is_some();

        if replaced {
            tracing::debug!(scheme = %scheme, "Replaced authenticator factory");
        } else {
            tracing::debug!(scheme = %scheme, "Registered authenticator factory");
        }
    }

    #[must_use]
    pub fn is_registered(&self, scheme: &str) -> bool {
        self.factories
            .read()
            .contains_key(&scheme.to_ascii_lowercase())
    }

    /// Registered scheme names, sorted.
    #[must_use]
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.factories.read().keys().cloned().collect();
        schemes.sort_unstable();
        schemes
    }

    /// Resolve a configuration URL to an authenticator.
    ///
    /// The factory registered for the URL scheme is called with the full
    /// configuration string.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if `config` does not parse as a URL
    /// - `UnknownScheme` if no factory is registered for its scheme
    /// - `Construction` if the factory fails
    #[tracing::instrument(skip_all, fields(scheme))]
    pub fn resolve(&self, config: &str) -> Result<Arc<dyn Authenticator>, ConfigError> {
        let url = Url::parse(config)?;
        let scheme = url.scheme();
        tracing::Span::current().record("scheme", scheme);

        let factory = self.factories.read().get(scheme).cloned();
        let Some(factory) = factory else {
            tracing::error!(
                scheme = %scheme,
                available = ?self.schemes(),
                "No authenticator registered for scheme"
            );
            return Err(ConfigError::UnknownScheme {
                scheme: scheme.to_owned(),
            });
        };

        let authenticator = factory(config).map_err(|source| ConfigError::Construction {
            scheme: scheme.to_owned(),
            source,
        })?;

        tracing::info!(scheme = %scheme, "Authenticator resolved");
        Ok(authenticator)
    }
}

/// Register `factory` under `scheme` in the process-wide registry.
pub fn register<F>(scheme: &str, factory: F)
where
    F: Fn(&str) -> anyhow::Result<Arc<dyn Authenticator>> + Send + Sync + 'static,
{
    Registry::global().register(scheme, factory);
}

/// Resolve `config` against the process-wide registry.
///
/// # Errors
///
/// See [`Registry::resolve`].
pub fn new_authenticator(config: &str) -> Result<Arc<dyn Authenticator>, ConfigError> {
    Registry::global().resolve(config)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use authn_context::RequestContext;

    use super::*;
    use crate::{AuthError, RequestHeaders};

    struct Named(&'static str);

    #[async_trait]
    impl Authenticator for Named {
        async fn authenticate(
            &self,
            ctx: &RequestContext,
            _path: &str,
            _headers: &RequestHeaders,
            _ip: &str,
        ) -> Result<RequestContext, AuthError> {
            let mut headers = authn_context::TrustedHeaders::new();
            headers.set("x-backend", self.0);
            Ok(ctx.with_trusted_headers(headers))
        }

        async fn ready(&self, _ctx: &RequestContext) -> bool {
            true
        }
    }

    async fn backend_name(authenticator: &dyn Authenticator) -> String {
        let ctx = authenticator
            .authenticate(&RequestContext::new(), "/", &RequestHeaders::new(), "")
            .await
            .unwrap();
        ctx.trusted_headers().get("x-backend").unwrap().to_owned()
    }

    #[tokio::test]
    async fn resolve_calls_factory_with_full_config() {
        let registry = Registry::new();
        let seen = Arc::new(parking_lot::Mutex::new(String::new()));
        let seen_in_factory = seen.clone();
        registry.register("demo", move |config| {
            *seen_in_factory.lock() = config.to_owned();
            Ok(Arc::new(Named("demo")) as Arc<dyn Authenticator>)
        });

        let authenticator = registry.resolve("demo://host:9000/path?x=1").unwrap();

        assert_eq!(*seen.lock(), "demo://host:9000/path?x=1");
        assert_eq!(backend_name(authenticator.as_ref()).await, "demo");
    }

    #[tokio::test]
    async fn reregistering_keeps_only_latest_factory() {
        let registry = Registry::new();
        registry.register("demo", |_| Ok(Arc::new(Named("first")) as Arc<dyn Authenticator>));
        registry.register("demo", |_| Ok(Arc::new(Named("second")) as Arc<dyn Authenticator>));

        assert_eq!(registry.schemes(), vec!["demo".to_owned()]);
        let authenticator = registry.resolve("demo://").unwrap();
        assert_eq!(backend_name(authenticator.as_ref()).await, "second");
    }

    #[test]
    #[tracing_test::traced_test]
    fn reregistering_logs_replacement() {
        let registry = Registry::new();
        registry.register("demo", |_| Ok(Arc::new(Named("first")) as Arc<dyn Authenticator>));
        assert!(!logs_contain("Replaced authenticator factory"));

        registry.register("demo", |_| Ok(Arc::new(Named("second")) as Arc<dyn Authenticator>));
        assert!(logs_contain("Replaced authenticator factory"));
    }

    #[test]
    fn unknown_scheme_is_config_error() {
        let registry = Registry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        registry.register("trust", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Named("trust")) as Arc<dyn Authenticator>)
        });

        let err = registry.resolve("ldap://directory").err().unwrap();
        match err {
            ConfigError::UnknownScheme { scheme } => assert_eq!(scheme, "ldap"),
            other => panic!("Expected UnknownScheme, got: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn malformed_url_is_config_error() {
        let registry = Registry::new();
        let err = registry.resolve("not a url").err().unwrap();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn factory_failure_is_construction_error() {
        let registry = Registry::new();
        registry.register("broken", |_| Err(anyhow::anyhow!("cannot dial backend")));

        let err = registry.resolve("broken://svc").err().unwrap();
        assert!(matches!(err, ConfigError::Construction { ref scheme, .. } if scheme == "broken"));
        assert!(err.to_string().contains("cannot dial backend"));
    }

    #[test]
    fn schemes_are_case_insensitive() {
        let registry = Registry::new();
        registry.register("Trust", |_| Ok(Arc::new(Named("trust")) as Arc<dyn Authenticator>));

        assert!(registry.is_registered("TRUST"));
        assert!(registry.resolve("TRUST://").is_ok());
    }
}

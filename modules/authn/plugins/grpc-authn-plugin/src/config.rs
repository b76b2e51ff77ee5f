//! Configuration for the remote gRPC authenticator, parsed from the
//! authenticator configuration URL.

use std::time::Duration;

use url::Url;

use crate::domain::RemoteSetupError;

/// Remote authenticator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Target address: host, port and path of the config URL, scheme stripped.
    pub target: String,
    /// Upper bound for establishing the connection.
    pub connect_timeout: Option<Duration>,
    /// Upper bound for every RPC, applied on top of the request deadline.
    pub timeout: Option<Duration>,
}

impl RemoteConfig {
    /// Parse `grpc://host:port/path?connect_timeout=2s&timeout=5s`.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if `config` is not a URL
    /// - `MissingHost` if the URL has no host
    /// - `InvalidParameter` / `UnknownParameter` for bad query parameters
    pub fn from_url(config: &str) -> Result<Self, RemoteSetupError> {
        let url = Url::parse(config)?;

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or(RemoteSetupError::MissingHost)?;
        let mut target = host.to_owned();
        if let Some(port) = url.port() {
            target.push(':');
            target.push_str(&port.to_string());
        }
        target.push_str(url.path());

        let mut cfg = Self {
            target,
            connect_timeout: None,
            timeout: None,
        };

        for (name, value) in url.query_pairs() {
            let duration = || {
                humantime::parse_duration(&value).map_err(|e| RemoteSetupError::InvalidParameter {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            };
            match name.as_ref() {
                "connect_timeout" => cfg.connect_timeout = Some(duration()?),
                "timeout" => cfg.timeout = Some(duration()?),
                other => return Err(RemoteSetupError::UnknownParameter(other.to_owned())),
            }
        }

        Ok(cfg)
    }

    /// URI handed to the gRPC transport.
    #[must_use]
    pub fn endpoint_uri(&self) -> String {
        format!("http://{}", self.target)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn target_is_host_port_and_path() {
        let cfg = RemoteConfig::from_url("grpcauth://svc:9000/v1").unwrap();

        assert_eq!(cfg.target, "svc:9000/v1");
        assert_eq!(cfg.endpoint_uri(), "http://svc:9000/v1");
        assert_eq!(cfg.connect_timeout, None);
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn target_without_port_or_path() {
        let cfg = RemoteConfig::from_url("grpc://auth.internal").unwrap();
        assert_eq!(cfg.target, "auth.internal");
    }

    #[test]
    fn ipv6_host_keeps_brackets() {
        let cfg = RemoteConfig::from_url("grpc://[::1]:9000").unwrap();
        assert_eq!(cfg.target, "[::1]:9000");
    }

    #[test]
    fn parses_timeouts() {
        let cfg =
            RemoteConfig::from_url("grpc://svc:9000?connect_timeout=2s&timeout=150ms").unwrap();

        assert_eq!(cfg.target, "svc:9000");
        assert_eq!(cfg.connect_timeout, Some(Duration::from_secs(2)));
        assert_eq!(cfg.timeout, Some(Duration::from_millis(150)));
    }

    #[test]
    fn rejects_missing_host() {
        let err = RemoteConfig::from_url("grpc://").unwrap_err();
        assert!(matches!(err, RemoteSetupError::MissingHost));
    }

    #[test]
    fn rejects_bad_duration() {
        let err = RemoteConfig::from_url("grpc://svc:9000?timeout=soon").unwrap_err();
        assert!(
            matches!(err, RemoteSetupError::InvalidParameter { ref name, .. } if name == "timeout")
        );
    }

    #[test]
    fn rejects_unknown_parameter() {
        let err = RemoteConfig::from_url("grpc://svc:9000?tls=true").unwrap_err();
        assert!(matches!(err, RemoteSetupError::UnknownParameter(ref name) if name == "tls"));
    }
}

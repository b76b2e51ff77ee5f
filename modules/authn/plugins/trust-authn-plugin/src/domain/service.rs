//! Service implementation for the trust plugin.

use authn_sdk::{RequestHeaders, TrustedHeaders};

/// Trust `AuthN` service.
///
/// Echoes inbound headers back as trusted headers without checking them.
#[derive(Debug, Default, Clone, Copy)]
pub struct Service;

impl Service {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build trusted headers from inbound headers.
    ///
    /// Each name is lower-cased and mapped to its first value, lower-cased.
    /// Headers without any value are skipped.
    #[must_use]
    pub fn trusted_headers(headers: &RequestHeaders) -> TrustedHeaders {
        let mut trusted = TrustedHeaders::new();
        for (name, values) in headers.iter() {
            if let Some(first) = values.first() {
                trusted.set(name, first.to_lowercase());
            }
        }
        trusted
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn lowercases_names_and_values() {
        let headers: RequestHeaders = vec![("X-User", "Alice")].into_iter().collect();

        let trusted = Service::trusted_headers(&headers);
        assert_eq!(trusted.iter().collect::<Vec<_>>(), vec![("x-user", "alice")]);
    }

    #[test]
    fn keeps_first_value_only() {
        let headers: RequestHeaders = vec![("X-Role", "Admin"), ("X-Role", "Reader")]
            .into_iter()
            .collect();

        let trusted = Service::trusted_headers(&headers);
        assert_eq!(trusted.get("x-role"), Some("admin"));
    }

    #[test]
    fn empty_headers_yield_empty_carrier() {
        let trusted = Service::trusted_headers(&RequestHeaders::new());
        assert!(trusted.is_empty());
    }
}

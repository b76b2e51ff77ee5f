//! Client IP derivation.

use std::sync::LazyLock;

use authn_sdk::RequestHeaders;
use regex::Regex;

#[allow(clippy::expect_used)]
static PORT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[0-9]{2,5}$").expect("port suffix pattern is valid"));

/// Best-effort client IP for a request.
///
/// Proxy headers win over the transport peer: the first non-empty entry of
/// `x-forwarded-for`, then `x-real-ip`. Otherwise `peer` is used with its
/// `:port` suffix and IPv6 brackets removed. Returns an empty string when
/// nothing is known.
#[must_use]
pub fn real_ip(headers: &RequestHeaders, peer: &str) -> String {
    if let Some(forwarded) = headers.first("x-forwarded-for")
        && let Some(client) = forwarded
            .split(',')
            .map(str::trim)
            .find(|entry| !entry.is_empty())
    {
        return client.to_owned();
    }

    if let Some(real) = headers
        .first("x-real-ip")
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return real.to_owned();
    }

    strip_port(peer).to_owned()
}

fn strip_port(peer: &str) -> &str {
    let host = PORT_SUFFIX
        .find(peer)
        .map_or(peer, |suffix| &peer[..suffix.start()]);
    host.strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(host)
}

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Headers the caller is trusted to have, as decided by an authenticator.
///
/// Keys are always stored lower-case. Setting a key that differs from an
/// existing one only by case overwrites the existing value.
///
/// Once attached to a [`RequestContext`](crate::RequestContext) the carrier is
/// shared as an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(
    from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct TrustedHeaders {
    entries: BTreeMap<String, String>,
}

impl TrustedHeaders {
    /// Create an empty carrier.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Set `name` to `value`, lower-casing the name first.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_lowercase(), value.into());
    }

    /// Look up a header by any case variant of its name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(fold(name).as_ref()).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(fold(name).as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

fn fold(name: &str) -> Cow<'_, str> {
    if name.chars().any(char::is_uppercase) {
        Cow::Owned(name.to_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

impl<K, V> FromIterator<(K, V)> for TrustedHeaders
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.set(name.as_ref(), value);
        }
        headers
    }
}

impl From<BTreeMap<String, String>> for TrustedHeaders {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<TrustedHeaders> for BTreeMap<String, String> {
    fn from(headers: TrustedHeaders) -> Self {
        headers.entries
    }
}

//! Transport-neutral collection of inbound request headers.

use std::collections::BTreeMap;

use tonic::metadata::{KeyAndValueRef, MetadataMap};

/// Inbound request headers as handed to an [`Authenticator`](crate::Authenticator).
///
/// A name may carry several values. Names keep the spelling they arrived
/// with; authenticators decide how to normalize them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: BTreeMap<String, Vec<String>>,
}

impl RequestHeaders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to `name`, keeping any values already present.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// All values stored under exactly `name`.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries.get(name).map_or(&[], Vec::as_slice)
    }

    /// First value of the first entry whose name matches `name`
    /// ignoring ASCII case.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .find_map(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Iterate over `(name, values)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Iterate over every `(name, value)` pair, repeating the name for
    /// multi-valued headers.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

/// Values that are not valid visible ASCII are skipped.
impl From<&http::HeaderMap> for RequestHeaders {
    fn from(map: &http::HeaderMap) -> Self {
        map.iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect()
    }
}

/// Only ASCII metadata is carried over; `-bin` entries are skipped.
impl From<&MetadataMap> for RequestHeaders {
    fn from(metadata: &MetadataMap) -> Self {
        metadata
            .iter()
            .filter_map(|entry| match entry {
                KeyAndValueRef::Ascii(key, value) => value
                    .to_str()
                    .ok()
                    .map(|value| (key.as_str().to_owned(), value.to_owned())),
                KeyAndValueRef::Binary(..) => None,
            })
            .collect()
    }
}

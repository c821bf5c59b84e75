//! Server-reported field errors.
//!
//! The validation endpoint answers with a JSON object mapping a field path to
//! a list of messages:
//!
//! ```json
//! { "email": ["The email has already been taken."],
//!   "address.street": ["The street field is required."] }
//! ```
//!
//! Backends that serialize an empty collection as a list send `[]` instead of
//! `{}` when there are no errors; both (and `null`) read as an empty map.
//! Key order is kept as sent, since prefix lookup returns the first match.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::SeqAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

/// Ordered mapping from a server-chosen field path to its error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: Vec<(String, Vec<String>)>,
}

impl ErrorMap {
    /// Creates an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the messages for a path, replacing any existing entry in place.
    pub fn insert(&mut self, path: impl Into<String>, messages: Vec<String>) {
        let path = path.into();
        match self.entries.iter_mut().find(|(key, _)| *key == path) {
            Some((_, existing)) => *existing = messages,
            None => self.entries.push((path, messages)),
        }
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, path: impl Into<String>, messages: &[&str]) -> Self {
        self.insert(path, messages.iter().map(|m| m.to_string()).collect());
        self
    }

    /// Returns the messages stored under exactly this path.
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Returns the first entry whose path starts with `field`.
    ///
    /// Matching is by prefix so that `address` picks up `address.street` and
    /// `items` picks up `items.0.sku`.
    pub fn find_prefixed(&self, field: &str) -> Option<(&str, &[String])> {
        self.entries
            .iter()
            .find(|(key, _)| key.starts_with(field))
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
    }

    /// Returns the messages for `field` by prefix match, or an empty slice.
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.find_prefixed(field)
            .map(|(_, messages)| messages)
            .unwrap_or(&[])
    }

    /// Iterates entries in server order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
    }

    /// Returns the number of paths with errors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        let mut map = ErrorMap::new();
        for (path, messages) in iter {
            map.insert(path, messages);
        }
        map
    }
}

// =============================================================================
// Serialization
// =============================================================================

impl Serialize for ErrorMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, messages) in &self.entries {
            map.serialize_entry(key, messages)?;
        }
        map.end()
    }
}

// =============================================================================
// Deserialization
// =============================================================================

impl<'de> Deserialize<'de> for ErrorMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ErrorMapVisitor)
    }
}

/// A single entry's value: usually a list, occasionally a bare string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Messages {
    One(String),
    Many(Vec<String>),
}

impl From<Messages> for Vec<String> {
    fn from(messages: Messages) -> Self {
        match messages {
            Messages::One(message) => vec![message],
            Messages::Many(messages) => messages,
        }
    }
}

struct ErrorMapVisitor;

impl<'de> Visitor<'de> for ErrorMapVisitor {
    type Value = ErrorMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field paths to error messages, an empty list, or null")
    }

    fn visit_map<M>(self, mut map: M) -> Result<ErrorMap, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut errors = ErrorMap::new();
        while let Some(key) = map.next_key::<String>()? {
            let messages: Option<Messages> = map.next_value()?;
            errors.insert(key, messages.map(Vec::from).unwrap_or_default());
        }
        Ok(errors)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<ErrorMap, A::Error>
    where
        A: SeqAccess<'de>,
    {
        if seq.next_element::<serde::de::IgnoredAny>()?.is_some() {
            return Err(serde::de::Error::custom(
                "expected an empty list when no field has errors",
            ));
        }
        Ok(ErrorMap::new())
    }

    fn visit_unit<E>(self) -> Result<ErrorMap, E>
    where
        E: serde::de::Error,
    {
        Ok(ErrorMap::new())
    }

    fn visit_none<E>(self) -> Result<ErrorMap, E>
    where
        E: serde::de::Error,
    {
        Ok(ErrorMap::new())
    }
}

//! Attribute maps
//!
//! `Attributes` is an insertion-ordered key/value list, mirroring the OTLP
//! `KeyValue` array. Lookups are linear; resource attribute sets are small.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value
///
/// Serialized in the OTLP JSON shape, e.g. `{"stringValue": "acme"}`.
/// Integers are written as decimal strings and bytes as base64, as OTLP JSON
/// requires; integers are also accepted as plain JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "boolValue")]
    Bool(bool),
    #[serde(rename = "intValue", with = "int_string")]
    Int(i64),
    #[serde(rename = "doubleValue")]
    Double(f64),
    #[serde(rename = "bytesValue", with = "base64_bytes")]
    Bytes(Vec<u8>),
}

/// `intValue`: 64-bit integers as decimal strings
mod int_string {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntRepr {
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match IntRepr::deserialize(deserializer)? {
            IntRepr::Number(v) => Ok(v),
            IntRepr::Text(s) => s
                .parse()
                .map_err(|e| de::Error::custom(format!("invalid intValue '{s}': {e}"))),
        }
    }
}

/// `bytesValue`: standard base64
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| de::Error::custom(format!("invalid bytesValue: {e}")))
    }
}

impl AttributeValue {
    /// Get the string payload, if this is a string value
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

/// One key/value entry of an attribute set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: AttributeValue,
}

/// Insertion-ordered attribute set
///
/// Keys are unique: `insert` replaces the value of an existing key in place,
/// keeping its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<KeyValue>);

impl Attributes {
    /// Create an empty attribute set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace an attribute
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|kv| kv.key == key) {
            Some(existing) => existing.value = value,
            None => self.0.push(KeyValue { key, value }),
        }
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up an attribute by key
    #[inline]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.iter().find(|kv| kv.key == key).map(|kv| &kv.value)
    }

    /// Look up a string attribute by key
    ///
    /// Returns `None` when the key is missing or holds a non-string value.
    #[inline]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttributeValue::as_str)
    }

    /// Remove an attribute, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        let index = self.0.iter().position(|kv| kv.key == key)?;
        Some(self.0.remove(index).value)
    }

    /// Check if an attribute is present
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|kv| kv.key == key)
    }

    /// Number of attributes
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|kv| (kv.key.as_str(), &kv.value))
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

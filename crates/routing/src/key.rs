//! Route keys

use std::fmt;

/// Value extracted from a batch to select its destination
///
/// `Absent` is a regular key: it never matches a table entry and always
/// resolves to the default route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKey<'a> {
    /// The routing attribute was present with this string value
    Value(&'a str),
    /// The routing attribute was missing (or not a string)
    Absent,
}

impl<'a> RouteKey<'a> {
    /// Get the key value, if present
    #[inline]
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent => None,
        }
    }

    /// Check if the key is absent
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<'a> From<Option<&'a str>> for RouteKey<'a> {
    #[inline]
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

impl<'a> From<&'a str> for RouteKey<'a> {
    #[inline]
    fn from(value: &'a str) -> Self {
        Self::Value(value)
    }
}

impl fmt::Display for RouteKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.write_str(v),
            Self::Absent => f.write_str("<absent>"),
        }
    }
}

//! Identifier normalization.
//!
//! External identifiers arrive as integers, numeric strings or composite
//! strings, and the on-disk key column may be typed either way. Lookups never
//! trust one representation: they probe an ordered list of candidate keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A key inside a source store.
///
/// Keys are normalized when a store is built: integer columns become `Int`,
/// text columns become `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceKey {
    Int(i64),
    Text(String),
}

impl SourceKey {
    /// Text key helper.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for SourceKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for SourceKey {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for SourceKey {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SourceKey {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// An identifier as stored on an entity record, shape unknown.
///
/// Deserializes from either a JSON number or a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawIdentifier {
    Int(i64),
    Text(String),
}

impl RawIdentifier {
    /// Candidate keys to probe, in trial order, without duplicates:
    /// the value as-is, then as a string, then as an integer when the
    /// string is numeric. A failed cast contributes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use winegeo::{RawIdentifier, SourceKey};
    ///
    /// let keys = RawIdentifier::Int(42).candidates();
    /// assert_eq!(keys, vec![SourceKey::Int(42), SourceKey::text("42")]);
    ///
    /// let keys = RawIdentifier::from(" 42").candidates();
    /// assert_eq!(keys, vec![SourceKey::text(" 42"), SourceKey::Int(42)]);
    /// ```
    #[must_use]
    pub fn candidates(&self) -> Vec<SourceKey> {
        let as_is = match self {
            Self::Int(v) => SourceKey::Int(*v),
            Self::Text(v) => SourceKey::Text(v.clone()),
        };
        let as_string = SourceKey::Text(self.to_string());
        let as_int = match self {
            Self::Int(v) => Some(SourceKey::Int(*v)),
            Self::Text(v) => v.trim().parse::<i64>().ok().map(SourceKey::Int),
        };

        let mut out = Vec::with_capacity(3);
        for key in [Some(as_is), Some(as_string), as_int].into_iter().flatten() {
            if !out.contains(&key) {
                out.push(key);
            }
        }
        out
    }

    /// True for blank strings. Blank identifiers are treated as absent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(v) if v.trim().is_empty())
    }
}

impl fmt::Display for RawIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for RawIdentifier {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for RawIdentifier {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for RawIdentifier {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for RawIdentifier {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Probes `lookup` with each candidate of `id`, returning the first hit.
pub fn probe<'a, T>(
    id: &RawIdentifier,
    mut lookup: impl FnMut(&SourceKey) -> Option<&'a T>,
) -> Option<&'a T> {
    id.candidates().iter().find_map(|key| {
        let hit = lookup(key);
        tracing::trace!(%key, hit = hit.is_some(), "probe");
        hit
    })
}

/// A composite PDO identifier such as `PDO-IT-A0123` or `US-AVA-temecula_valley`.
///
/// Segments are split on `-`; the second segment names the source country
/// (or the AVA marker). Lookups inside a country partition use the full
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PdoId<'a> {
    raw: &'a str,
    country: &'a str,
}

impl<'a> PdoId<'a> {
    /// Parses a composite id. Fewer than two segments yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use winegeo::PdoId;
    ///
    /// assert_eq!(PdoId::parse("PDO-IT-A0123").unwrap().country(), "IT");
    /// assert_eq!(PdoId::parse("US-AVA-napa_valley").unwrap().country(), "AVA");
    /// assert!(PdoId::parse("FR").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut segments = raw.split('-');
        segments.next()?;
        let country = segments.next()?;
        Some(Self { raw, country })
    }

    /// The country-code (or marker) segment.
    #[must_use]
    pub const fn country(&self) -> &'a str {
        self.country
    }

    /// The full identifier, used as the lookup key.
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.raw
    }

    /// True when `marker` appears as a `-XX-` segment anywhere in the id,
    /// case-insensitive.
    #[must_use]
    pub fn mentions(raw: &str, marker: &str) -> bool {
        let needle = format!("-{}-", marker.to_ascii_uppercase());
        raw.to_ascii_uppercase().contains(&needle)
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Key of a stored entry (random UUID v4).
///
/// Keys are always generated by the cache, never supplied by the caller, so
/// two writes of the same value land under two distinct keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey(uuid::Uuid);

impl EntryKey {
    /// Generate a fresh random key.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse a hyphenated key string, as returned by `to_string()`.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidKey {
                key: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for EntryKey {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for EntryKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryKey({})", self.short_id())
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

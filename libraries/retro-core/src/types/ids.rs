/// ID types for Retro Rhythm entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
///
/// Opaque: the backend hands out numeric ids, uploads may use UUIDs, and the
/// player never interprets either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_become_strings() {
        let id = TrackId::from(7_i64);
        assert_eq!(id.as_str(), "7");
        assert_eq!(id, TrackId::new("7"));
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&TrackId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}

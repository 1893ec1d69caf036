//! Status enums for catalog records.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a remote catalog record.
///
/// The browsing layer only ever distinguishes `active` from everything else;
/// any other value the store invents (`draft`, `archived`, ...) is carried
/// verbatim so serialization round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    Active,
    Other(String),
}

impl RecordStatus {
    /// Whether the record is visible to the browsing layer.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<String> for RecordStatus {
    fn from(s: String) -> Self {
        if s == "active" { Self::Active } else { Self::Other(s) }
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Active => "active".to_string(),
            RecordStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_active_roundtrip() {
        let status: RecordStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, RecordStatus::Active);
        assert!(status.is_active());
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"active\"");
    }

    #[test]
    fn test_other_status_preserved() {
        let status: RecordStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(status, RecordStatus::Other("draft".to_string()));
        assert!(!status.is_active());
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"draft\"");
    }
}

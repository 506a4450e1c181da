use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one subscriber. Each subscriber owns exactly one subscription
/// and one connection for its lifetime.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(String);

impl SubscriberId {
    pub fn new() -> Self {
        Self(format!("sub_{}", Uuid::now_v7()))
    }

    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_id_has_prefix() {
        let id = SubscriberId::new();
        assert!(id.as_str().starts_with("sub_"), "got: {id}");
    }

    #[test]
    fn ids_are_unique() {
        let a = SubscriberId::new();
        let b = SubscriberId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn from_raw_preserves_value() {
        let id = SubscriberId::from_raw("custom-id");
        assert_eq!(id.as_str(), "custom-id");
    }

    #[test]
    fn serde_roundtrip() {
        let id = SubscriberId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: SubscriberId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}

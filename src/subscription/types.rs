//! Subscription types for TagRelay.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Boolean rule deciding whether an item is relevant to a subscriber.
///
/// `Advanced` carries its tag groups inline so they cannot exist (or be
/// half-populated) under any other policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Match when any subscribed tag appears on the item.
    Any,
    /// Match only when every subscribed tag appears on the item.
    All,
    /// Match when all `required` tags appear AND at least one `optional`
    /// tag appears. Either group may be empty, in which case its clause
    /// is vacuously true.
    Advanced {
        /// Tags that must all be present on the item.
        required: BTreeSet<String>,
        /// Tags of which at least one must be present (when non-empty).
        optional: BTreeSet<String>,
    },
}

impl Default for MatchPolicy {
    fn default() -> Self {
        MatchPolicy::Any
    }
}

/// A delivery target: a chat account with a tag set and a match policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Chat/account id.
    pub id: i64,
    /// Account username, if the platform exposes one.
    #[serde(default)]
    pub username: Option<String>,
    /// First name as reported by the platform.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name as reported by the platform.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Normalized hashtags the subscriber is interested in.
    ///
    /// Used directly by the `Any` and `All` policies. An empty set means
    /// the subscriber matches nothing and is skipped during sweeps.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Active match policy.
    #[serde(default)]
    pub policy: MatchPolicy,
}

impl Subscriber {
    /// Create a new subscriber with an empty tag set and the default policy.
    ///
    /// This is the record shape created on first contact with the command
    /// interface.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            username: None,
            first_name: None,
            last_name: None,
            tags: BTreeSet::new(),
            policy: MatchPolicy::default(),
        }
    }

    /// Set the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the first name.
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Set the tag set.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the match policy.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether this subscriber can match anything at all.
    ///
    /// `Any` and `All` need a non-empty tag set. `Advanced` always has a
    /// defined answer, including the degenerate both-groups-empty case
    /// which matches everything.
    pub fn has_selection(&self) -> bool {
        match &self.policy {
            MatchPolicy::Any | MatchPolicy::All => !self.tags.is_empty(),
            MatchPolicy::Advanced { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subscriber_defaults() {
        let sub = Subscriber::new(42);
        assert_eq!(sub.id, 42);
        assert!(sub.tags.is_empty());
        assert_eq!(sub.policy, MatchPolicy::Any);
    }

    #[test]
    fn test_with_tags() {
        let sub = Subscriber::new(1).with_tags(["#rust", "#tokio"]);
        assert_eq!(sub.tags.len(), 2);
        assert!(sub.tags.contains("#rust"));
    }

    #[test]
    fn test_has_selection_any_empty_tags() {
        let sub = Subscriber::new(1);
        assert!(!sub.has_selection());
    }

    #[test]
    fn test_has_selection_all_with_tags() {
        let sub = Subscriber::new(1)
            .with_tags(["#rust"])
            .with_policy(MatchPolicy::All);
        assert!(sub.has_selection());
    }

    #[test]
    fn test_has_selection_advanced_always() {
        let sub = Subscriber::new(1).with_policy(MatchPolicy::Advanced {
            required: BTreeSet::new(),
            optional: BTreeSet::new(),
        });
        assert!(sub.has_selection());
    }

    #[test]
    fn test_policy_serde_tagged() {
        let policy = MatchPolicy::Advanced {
            required: ["#a".to_string()].into_iter().collect(),
            optional: BTreeSet::new(),
        };
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("\"mode\":\"advanced\""));
        let back: MatchPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn test_subscriber_serde_defaults() {
        // A minimal stored record deserializes with empty tags and Any policy.
        let sub: Subscriber = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(sub.id, 7);
        assert!(sub.tags.is_empty());
        assert_eq!(sub.policy, MatchPolicy::Any);
    }
}

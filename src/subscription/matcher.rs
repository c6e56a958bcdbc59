//! Match engine for TagRelay.
//!
//! The single decision function of the system: given one subscriber's
//! policy and one item's tag set, decide match or no-match. Pure,
//! deterministic, order-independent (set semantics).

use std::collections::BTreeSet;

use crate::subscription::types::{MatchPolicy, Subscriber};

/// Decide whether an item with the given tag set is relevant to a subscriber.
pub fn matches(subscriber: &Subscriber, item_tags: &BTreeSet<String>) -> bool {
    match &subscriber.policy {
        MatchPolicy::Any => !subscriber.tags.is_disjoint(item_tags),
        MatchPolicy::All => subscriber.tags.is_subset(item_tags),
        MatchPolicy::Advanced { required, optional } => {
            // Conjunction of an AND-group and an OR-group. Each clause is
            // vacuously true when its group is empty; with both groups
            // empty the policy matches everything.
            required.is_subset(item_tags)
                && (optional.is_empty() || !optional.is_disjoint(item_tags))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags<const N: usize>(list: [&str; N]) -> BTreeSet<String> {
        list.into_iter().map(String::from).collect()
    }

    fn any_subscriber<const N: usize>(list: [&str; N]) -> Subscriber {
        Subscriber::new(1).with_tags(list)
    }

    fn all_subscriber<const N: usize>(list: [&str; N]) -> Subscriber {
        Subscriber::new(1).with_tags(list).with_policy(MatchPolicy::All)
    }

    fn advanced_subscriber<const R: usize, const O: usize>(
        required: [&str; R],
        optional: [&str; O],
    ) -> Subscriber {
        Subscriber::new(1).with_policy(MatchPolicy::Advanced {
            required: tags(required),
            optional: tags(optional),
        })
    }

    #[test]
    fn test_any_overlapping() {
        let sub = any_subscriber(["#a", "#b"]);
        assert!(matches(&sub, &tags(["#b", "#c"])));
    }

    #[test]
    fn test_any_disjoint() {
        let sub = any_subscriber(["#a", "#b"]);
        assert!(!matches(&sub, &tags(["#c", "#d"])));
    }

    #[test]
    fn test_any_empty_item_tags() {
        let sub = any_subscriber(["#a"]);
        assert!(!matches(&sub, &BTreeSet::new()));
    }

    #[test]
    fn test_all_superset() {
        let sub = all_subscriber(["#a", "#b"]);
        assert!(matches(&sub, &tags(["#a", "#b", "#c"])));
    }

    #[test]
    fn test_all_missing_tag() {
        let sub = all_subscriber(["#a", "#b"]);
        assert!(!matches(&sub, &tags(["#a"])));
    }

    #[test]
    fn test_all_exact_set() {
        let sub = all_subscriber(["#a", "#b"]);
        assert!(matches(&sub, &tags(["#a", "#b"])));
    }

    #[test]
    fn test_all_empty_subscription_is_vacuous() {
        // The sweep excludes empty-tag subscribers before matching, but the
        // function itself follows subset semantics.
        let sub = all_subscriber([]);
        assert!(matches(&sub, &tags(["#a"])));
    }

    #[test]
    fn test_advanced_required_and_optional_satisfied() {
        let sub = advanced_subscriber(["#a", "#b"], ["#c", "#d"]);
        assert!(matches(&sub, &tags(["#a", "#b", "#c"])));
    }

    #[test]
    fn test_advanced_missing_required() {
        let sub = advanced_subscriber(["#a", "#b"], ["#c", "#d"]);
        assert!(!matches(&sub, &tags(["#a", "#c"])));
    }

    #[test]
    fn test_advanced_no_optional_present() {
        let sub = advanced_subscriber(["#a", "#b"], ["#c", "#d"]);
        assert!(!matches(&sub, &tags(["#a", "#b"])));
    }

    #[test]
    fn test_advanced_empty_required_group() {
        let sub = advanced_subscriber([], ["#c", "#d"]);
        assert!(matches(&sub, &tags(["#d"])));
        assert!(!matches(&sub, &tags(["#a"])));
    }

    #[test]
    fn test_advanced_empty_optional_group() {
        let sub = advanced_subscriber(["#a"], []);
        assert!(matches(&sub, &tags(["#a", "#z"])));
        assert!(!matches(&sub, &tags(["#z"])));
    }

    #[test]
    fn test_advanced_both_groups_empty_matches_everything() {
        let sub = advanced_subscriber([], []);
        assert!(matches(&sub, &tags(["#anything"])));
        assert!(matches(&sub, &BTreeSet::new()));
    }

    #[test]
    fn test_order_independence() {
        let forward = any_subscriber(["#a", "#b", "#c"]);
        let reverse = any_subscriber(["#c", "#b", "#a"]);
        let item = tags(["#c"]);
        assert_eq!(matches(&forward, &item), matches(&reverse, &item));
    }
}

//! Subscription management for TagRelay.
//!
//! Subscriber records, match policies, the store contract, and the match
//! engine that decides item relevance.

pub mod matcher;
pub mod store;
pub mod types;

pub use matcher::matches;
pub use store::{JsonSubscriptionStore, MemorySubscriptionStore, SubscriptionStore};
pub use types::{MatchPolicy, Subscriber};

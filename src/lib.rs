//! TagRelay - Hashtag subscription relay
//!
//! Ingests posts from a single source channel, tags them with normalized
//! hashtags, and forwards matching posts to subscribers according to their
//! chosen match policy, with rate-limit-aware retry and partial-failure
//! isolation.

pub mod config;
pub mod delivery;
pub mod error;
pub mod ingest;
pub mod item;
pub mod logging;
pub mod stats;
pub mod subscription;
pub mod tag;
pub mod transport;

pub use config::Config;
pub use delivery::{
    BroadcastOptions, DeliverySweep, Dispatcher, Outcome, SweepControl, SweepReport,
};
pub use error::{Result, TagRelayError};
pub use item::{Item, ItemStore, JsonItemStore, MemoryItemStore, Renderer};
pub use stats::TagStats;
pub use subscription::{
    matches, JsonSubscriptionStore, MatchPolicy, MemorySubscriptionStore, Subscriber,
    SubscriptionStore,
};
pub use transport::{FormatHint, SendOutcome, TelegramTransport, Transport};

//! Delivery core for TagRelay.
//!
//! The dispatcher (one message, one recipient, bounded retry) and the
//! sweep (matching and dispatching over the whole population).

pub mod dispatcher;
pub mod sweep;

pub use dispatcher::{Dispatcher, Outcome};
pub use sweep::{BroadcastOptions, DeliverySweep, SweepControl, SweepReport, DEFAULT_PACING_SECS};

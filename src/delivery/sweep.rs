//! Delivery sweep for TagRelay.
//!
//! One complete pass of matching and dispatching over the subscriber and
//! item population. The sweep is strictly sequential: the transport's rate
//! limit is shared and global, so there is no parallel fan-out. Stores are
//! injected at construction time; the sweep never touches process-wide
//! state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::delivery::dispatcher::{Dispatcher, Outcome};
use crate::item::{Item, ItemStore, Renderer};
use crate::subscription::{matcher, SubscriptionStore};
use crate::transport::Transport;
use crate::Result;

/// Default pacing delay between consecutive dispatches in broadcast mode.
pub const DEFAULT_PACING_SECS: u64 = 1;

/// Progress is logged after every this many sends.
const PROGRESS_EVERY: usize = 5;

/// Shared handle for cooperative cancellation and progress observation.
///
/// The stop flag is checked before every dispatch, so a stop request takes
/// effect before the next send, never mid-flight of one in progress. The
/// `sent_so_far` counter is readable throughout the sweep (the command
/// interface uses it for status updates).
#[derive(Debug, Default)]
pub struct SweepControl {
    stopped: AtomicBool,
    sent: AtomicUsize,
}

impl SweepControl {
    /// Create a fresh control handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the sweep to stop before its next dispatch.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Messages sent so far in the current sweep.
    pub fn sent_so_far(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    /// Clear the stop flag and counter for reuse across sweeps.
    pub fn reset(&self) {
        self.stopped.store(false, Ordering::SeqCst);
        self.sent.store(0, Ordering::SeqCst);
    }

    fn record_sent(&self) -> usize {
        self.sent.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Options for a broadcast sweep.
#[derive(Debug, Clone, Default)]
pub struct BroadcastOptions {
    /// Cap on matched items per subscriber (`None` = all).
    pub limit: Option<usize>,
    /// Deliver most recent items first.
    pub newest_first: bool,
}

impl BroadcastOptions {
    /// Create default options: all matched items, ingestion order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap matched items per subscriber.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Deliver most recent items first.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }
}

/// Result of one sweep, reported identically on stop and on completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Messages delivered (including after a rate-limit retry).
    pub sent: usize,
    /// Deliveries that needed a rate-limit retry.
    pub retried: usize,
    /// Permanently failed deliveries.
    pub failed: usize,
    /// Subscribers skipped: empty tag set, or no match in single-item mode.
    pub skipped: usize,
    /// Matched (subscriber, item) pairs planned for dispatch.
    pub total: usize,
    /// Whether the sweep was stopped before completing.
    pub stopped: bool,
}

/// Matching and delivery engine over injected stores and transport.
pub struct DeliverySweep<T: Transport> {
    subscriptions: Arc<dyn SubscriptionStore>,
    items: Arc<dyn ItemStore>,
    dispatcher: Dispatcher<T>,
    renderer: Renderer,
    pacing: Duration,
    control: Arc<SweepControl>,
}

impl<T: Transport> DeliverySweep<T> {
    /// Create a sweep over the given stores and transport.
    pub fn new(
        subscriptions: Arc<dyn SubscriptionStore>,
        items: Arc<dyn ItemStore>,
        transport: T,
    ) -> Self {
        Self {
            subscriptions,
            items,
            dispatcher: Dispatcher::new(transport),
            renderer: Renderer::new(),
            pacing: Duration::from_secs(DEFAULT_PACING_SECS),
            control: Arc::new(SweepControl::new()),
        }
    }

    /// Set the pacing delay between consecutive dispatches.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Set the message renderer.
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Use an externally owned control handle (for operator stop buttons).
    pub fn with_control(mut self, control: Arc<SweepControl>) -> Self {
        self.control = control;
        self
    }

    /// The control handle for this sweep.
    pub fn control(&self) -> Arc<SweepControl> {
        Arc::clone(&self.control)
    }

    /// The dispatcher driving this sweep.
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Broadcast mode: for every subscriber, deliver every matching item
    /// from a point-in-time snapshot of the item store.
    ///
    /// Items arriving mid-sweep are not observed; they belong to the next
    /// sweep. Subscription edits mid-sweep may or may not be observed
    /// (eventual consistency is accepted there).
    pub async fn broadcast(&self, options: &BroadcastOptions) -> Result<SweepReport> {
        let subscribers = self.subscriptions.list_all()?;
        let snapshot = self.items.list_all()?;
        info!(
            "Broadcast sweep: {} subscriber(s), {} item(s)",
            subscribers.len(),
            snapshot.len()
        );

        let mut report = SweepReport::default();
        'subscribers: for subscriber in &subscribers {
            if !subscriber.has_selection() {
                report.skipped += 1;
                continue;
            }

            let mut matched: Vec<&Item> = snapshot
                .iter()
                .filter(|item| matcher::matches(subscriber, &item.tags))
                .collect();
            if options.newest_first {
                matched.reverse();
            }
            if let Some(limit) = options.limit {
                matched.truncate(limit);
            }
            report.total += matched.len();

            for item in matched {
                if self.control.is_stopped() {
                    report.stopped = true;
                    break 'subscribers;
                }
                self.dispatch(subscriber.id, item, &mut report).await;
                sleep(self.pacing).await;
            }
        }

        info!(
            "Broadcast sweep finished: sent={}/{} failed={} skipped={}{}",
            report.sent,
            report.total,
            report.failed,
            report.skipped,
            if report.stopped { " (stopped)" } else { "" }
        );
        Ok(report)
    }

    /// Single-new-item mode: deliver one freshly ingested item to every
    /// subscriber whose policy matches it.
    ///
    /// Invoked by the ingestion collaborator right after the item is
    /// persisted. An item without tags matches nobody and sweeps nothing.
    pub async fn send_new_item(&self, item: &Item) -> Result<SweepReport> {
        let mut report = SweepReport::default();
        if item.tags.is_empty() {
            return Ok(report);
        }

        let subscribers = self.subscriptions.list_all()?;
        debug!(
            "New-item sweep for item {}: {} subscriber(s)",
            item.id,
            subscribers.len()
        );

        for subscriber in &subscribers {
            if self.control.is_stopped() {
                report.stopped = true;
                break;
            }
            if !subscriber.has_selection() || !matcher::matches(subscriber, &item.tags) {
                report.skipped += 1;
                continue;
            }
            report.total += 1;
            self.dispatch(subscriber.id, item, &mut report).await;
            sleep(self.pacing).await;
        }

        Ok(report)
    }

    /// Render and deliver one item to one recipient, recording the outcome.
    ///
    /// Failures are logged and counted; they never propagate, so one
    /// recipient's failure cannot abort the sweep for the others.
    async fn dispatch(&self, recipient: i64, item: &Item, report: &mut SweepReport) {
        let body = self.renderer.render(item);
        match self.dispatcher.send(recipient, &body).await {
            Outcome::Sent => {
                report.sent += 1;
                let so_far = self.control.record_sent();
                if so_far % PROGRESS_EVERY == 0 {
                    debug!("Sweep progress: {so_far} message(s) sent");
                }
            }
            Outcome::SentAfterRetry => {
                report.sent += 1;
                report.retried += 1;
                let so_far = self.control.record_sent();
                if so_far % PROGRESS_EVERY == 0 {
                    debug!("Sweep progress: {so_far} message(s) sent");
                }
            }
            Outcome::Failed { reason } => {
                warn!("Delivery of item {} to {recipient} failed: {reason}", item.id);
                report.failed += 1;
            }
        }
    }
}

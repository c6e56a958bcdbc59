//! Message dispatcher for TagRelay.
//!
//! The unit of retry: one rendered message to one recipient. The
//! dispatcher owns the two recovery paths — a single bounded retry after
//! a rate-limit signal, and a plain-text resend when the transport rejects
//! the message formatting. Every failure is contained here; nothing the
//! dispatcher returns can abort a sweep.

use tokio::time::sleep;
use tracing::{info, warn};

use crate::item::render::{clean_markdown, strip_markdown};
use crate::transport::{FormatHint, SendOutcome, Transport};

/// Final outcome of one delivery attempt, retries included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Delivered on the first attempt.
    Sent,
    /// Delivered after one rate-limit back-off.
    SentAfterRetry,
    /// Not delivered; permanent for this message only.
    Failed {
        /// Why the delivery failed.
        reason: String,
    },
}

impl Outcome {
    /// Whether the message was delivered.
    pub fn is_sent(&self) -> bool {
        matches!(self, Outcome::Sent | Outcome::SentAfterRetry)
    }
}

/// Retry-aware single-message dispatcher.
pub struct Dispatcher<T: Transport> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher over the given transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// One transport attempt with the content-safety fallback.
    ///
    /// Tries cleaned markdown first; if the transport rejects the
    /// formatting, strips all markers and resends as plain text. The
    /// fallback result is returned as-is.
    async fn attempt(&self, recipient: i64, body: &str) -> SendOutcome {
        let rich = clean_markdown(body);
        match self
            .transport
            .send_message(recipient, &rich, FormatHint::Markdown)
            .await
        {
            SendOutcome::Rejected { reason } => {
                warn!("Formatting rejected for {recipient} ({reason}); resending as plain text");
                let plain = strip_markdown(body);
                self.transport
                    .send_message(recipient, &plain, FormatHint::Plain)
                    .await
            }
            other => other,
        }
    }

    /// Deliver one message, retrying exactly once on a rate-limit signal.
    ///
    /// The back-off sleeps for exactly the duration the transport asked
    /// for. A second rate limit on the retry is a permanent failure for
    /// this message; the sweep moves on to the next one.
    pub async fn send(&self, recipient: i64, body: &str) -> Outcome {
        match self.attempt(recipient, body).await {
            SendOutcome::Sent => Outcome::Sent,
            SendOutcome::RateLimited { retry_after } => {
                info!(
                    "Rate limited sending to {recipient}; retrying in {}s",
                    retry_after.as_secs()
                );
                sleep(retry_after).await;
                match self.attempt(recipient, body).await {
                    SendOutcome::Sent => Outcome::SentAfterRetry,
                    SendOutcome::RateLimited { .. } => {
                        warn!("Rate limited again on retry for {recipient}; giving up");
                        Outcome::Failed {
                            reason: "rate limited on retry".to_string(),
                        }
                    }
                    SendOutcome::Rejected { reason } | SendOutcome::Fatal { reason } => {
                        warn!("Delivery to {recipient} failed on retry: {reason}");
                        Outcome::Failed { reason }
                    }
                }
            }
            SendOutcome::Rejected { reason } => {
                // The plain-text fallback was itself rejected.
                warn!("Delivery to {recipient} rejected after fallback: {reason}");
                Outcome::Failed { reason }
            }
            SendOutcome::Fatal { reason } => {
                warn!("Delivery to {recipient} failed: {reason}");
                Outcome::Failed { reason }
            }
        }
    }
}

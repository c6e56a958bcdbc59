//! Transport boundary for TagRelay.
//!
//! A transport delivers one rendered message to one recipient and reports
//! the outcome as data rather than by raising errors; retry orchestration
//! lives in the dispatcher, not here.

pub mod telegram;

use std::time::Duration;

use async_trait::async_trait;

pub use telegram::TelegramTransport;

/// How the transport should interpret the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    /// Markdown formatting.
    Markdown,
    /// Plain text, no formatting markers interpreted.
    Plain,
}

/// Result of one transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Message accepted by the transport.
    Sent,
    /// Transport asked us to back off before sending again.
    RateLimited {
        /// How long to wait before retrying.
        retry_after: Duration,
    },
    /// Transport rejected the message content (e.g., a formatting parse
    /// error). Recoverable by resending as plain text.
    Rejected {
        /// Rejection reason as reported by the transport.
        reason: String,
    },
    /// Unrecoverable failure for this recipient (blocked, unreachable,
    /// network error).
    Fatal {
        /// Failure reason.
        reason: String,
    },
}

/// Trait for message transports.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Attempt to deliver one message to one recipient.
    async fn send_message(&self, recipient: i64, text: &str, format: FormatHint) -> SendOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_equality() {
        assert_eq!(SendOutcome::Sent, SendOutcome::Sent);
        assert_ne!(
            SendOutcome::Sent,
            SendOutcome::RateLimited {
                retry_after: Duration::from_secs(1)
            }
        );
    }
}

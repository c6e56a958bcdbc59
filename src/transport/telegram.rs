//! Telegram Bot API transport.
//!
//! Maps Bot API responses onto [`SendOutcome`]: HTTP 429 becomes a
//! rate-limit signal carrying the server's `retry_after`, formatting parse
//! errors become rejections eligible for the plain-text fallback, and
//! everything else (blocked recipient, network failure) is fatal for the
//! message in question.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::transport::{FormatHint, SendOutcome, Transport};

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Back-off applied when a 429 response carries no `retry_after` field.
const FALLBACK_RETRY_AFTER_SECS: u64 = 30;

/// Telegram Bot API message transport.
pub struct TelegramTransport {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramTransport {
    /// Create a transport for the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
        }
    }

    /// Override the API base URL (used for tests and proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }

    /// Map an HTTP status and response body onto a send outcome.
    fn classify(status: u16, body: &Value) -> SendOutcome {
        if (200..300).contains(&status) {
            return SendOutcome::Sent;
        }

        let description = body
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();

        match status {
            429 => {
                let retry_after = body
                    .get("parameters")
                    .and_then(|p| p.get("retry_after"))
                    .and_then(Value::as_u64)
                    .unwrap_or(FALLBACK_RETRY_AFTER_SECS);
                SendOutcome::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                }
            }
            400 if description.to_lowercase().contains("parse") => SendOutcome::Rejected {
                reason: description,
            },
            _ => SendOutcome::Fatal {
                reason: format!("HTTP {status}: {description}"),
            },
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_message(&self, recipient: i64, text: &str, format: FormatHint) -> SendOutcome {
        let mut payload = json!({
            "chat_id": recipient,
            "text": text,
        });
        if format == FormatHint::Markdown {
            payload["parse_mode"] = json!("Markdown");
        }

        let response = match self.client.post(self.send_url()).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                return SendOutcome::Fatal {
                    reason: format!("network error: {e}"),
                }
            }
        };

        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        debug!("sendMessage to {recipient}: HTTP {status}");

        Self::classify(status, &body)
    }
}

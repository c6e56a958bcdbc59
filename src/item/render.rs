//! Message rendering for TagRelay.
//!
//! Assembles the outgoing text for one item (headline, body, tags, source
//! link) and provides the two-stage markdown safety pipeline: transports
//! with strict markdown parsers reject unbalanced markers, so the rendered
//! body is cleaned before the rich-format attempt and fully stripped for
//! the plain-text fallback.

use std::sync::OnceLock;

use regex::Regex;

use crate::item::types::Item;

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").unwrap())
}

fn italic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__(.*?)__").unwrap())
}

fn single_star_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*(.*?)\*").unwrap())
}

fn single_underscore_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_(.*?)_").unwrap())
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap())
}

fn code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").unwrap())
}

/// Renders items into outgoing message text.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    /// Source channel name used for deep links back to the original post.
    channel: Option<String>,
}

impl Renderer {
    /// Create a renderer without a source channel (no deep links).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source channel name.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Render an item to message text.
    ///
    /// Layout: headline, body, blank line, tag line, then either a deep
    /// link to the original channel post (when the message id and channel
    /// are known) or the item's own URL.
    pub fn render(&self, item: &Item) -> String {
        let mut text = format!("{}\n{}\n\n", item.needs, item.body);

        let tags: Vec<&str> = item.tags.iter().map(String::as_str).collect();
        text.push_str(&tags.join(" "));
        text.push('\n');

        match (item.message_id, &self.channel) {
            (Some(message_id), Some(channel)) => {
                let url = format!("https://t.me/{channel}/{message_id}");
                text.push_str(&format!("__👉__ [Open @{channel} post]({url})\n"));
            }
            _ => {
                text.push_str(&item.url);
                text.push('\n');
            }
        }

        text
    }
}

/// Clean markdown so a strict transport parser accepts it.
///
/// Double markers are reduced to single ones, orphaned markers outside of
/// links are dropped, and backticks are replaced with quotes. Link syntax
/// is left intact.
pub fn clean_markdown(text: &str) -> String {
    let mut text = bold_re().replace_all(text, "*$1*").to_string();
    text = italic_re().replace_all(&text, "_${1}_").to_string();

    // Count markers outside of link syntax; an odd count means one marker
    // is unbalanced and would make the parser reject the whole message.
    let without_links = link_re().replace_all(&text, "");
    if without_links.matches('*').count() % 2 != 0 {
        text = remove_last_unlinked(&text, '*');
    }
    let without_links = link_re().replace_all(&text, "");
    if without_links.matches('_').count() % 2 != 0 {
        text = remove_last_unlinked(&text, '_');
    }

    text.replace('`', "'")
}

/// Remove the last occurrence of `marker` that sits before any link syntax.
fn remove_last_unlinked(text: &str, marker: char) -> String {
    let safe_end = text.find('[').unwrap_or(text.len());
    match text[..safe_end].rfind(marker) {
        Some(pos) => {
            let mut cleaned = String::with_capacity(text.len());
            cleaned.push_str(&text[..pos]);
            cleaned.push_str(&text[pos + marker.len_utf8()..]);
            cleaned
        }
        None => text.to_string(),
    }
}

/// Strip all markdown formatting, keeping only the readable text.
///
/// The fallback when the transport rejects even cleaned markdown.
pub fn strip_markdown(text: &str) -> String {
    let text = bold_re().replace_all(text, "$1");
    let text = single_star_re().replace_all(&text, "$1");
    let text = italic_re().replace_all(&text, "$1");
    let text = single_underscore_re().replace_all(&text, "$1");
    let text = link_re().replace_all(&text, "$1");
    code_re().replace_all(&text, "$1").to_string()
}

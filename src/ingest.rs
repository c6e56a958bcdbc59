//! Post parsing for the ingestion side.
//!
//! The source channel formats its posts as blank-line-separated sections:
//! a headline ("needs"), the body, a line of hashtags, and a contact URL.
//! Posts that do not fit that layout are skipped by the ingestion job.

use crate::item::Item;
use crate::tag;

/// Minimum number of blank-line-separated sections in a well-formed post.
const MIN_SECTIONS: usize = 4;

/// Parse one raw channel post into an item.
///
/// Returns `None` when the post has fewer than four sections and therefore
/// is not a structured listing. The `message_id`, when known, lets the
/// renderer build a deep link back to the original post.
pub fn parse_post(id: i64, text: &str, message_id: Option<i64>) -> Option<Item> {
    let sections: Vec<&str> = text.split("\n\n").collect();
    if sections.len() < MIN_SECTIONS {
        return None;
    }

    let needs = sections[0].trim();
    let body = sections[1].trim();
    let tags = tag::scan_tags(sections[2]);
    let url = sections[3].trim();

    let mut item = Item::new(id, needs, body).with_tags(tags).with_url(url);
    if let Some(message_id) = message_id {
        item = item.with_message_id(message_id);
    }
    Some(item)
}

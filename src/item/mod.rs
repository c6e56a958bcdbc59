//! Item handling for TagRelay.
//!
//! Item records, the store contract, and message rendering.

pub mod render;
pub mod store;
pub mod types;

pub use render::{clean_markdown, strip_markdown, Renderer};
pub use store::{ItemStore, JsonItemStore, MemoryItemStore};
pub use types::Item;

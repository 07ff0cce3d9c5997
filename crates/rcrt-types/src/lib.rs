//! Foundation types for rcrt, a small personal timeline.
//!
//! Every other rcrt crate depends on `rcrt-types`.
//!
//! # Key Types
//!
//! - [`EntryId`]: Six-character alphanumeric key naming one entry in a store
//! - [`Entry`]: Tagged timeline item (`post`, `text_inline`, `link`, `article`, `image`)
//! - [`InlineRef`]: A `[label]#<id>` marker found in article text

pub mod entry;
pub mod error;
pub mod identity;
pub mod reference;

pub use entry::Entry;
pub use error::TypeError;
pub use identity::{EntryId, ID_ALPHABET, ID_LEN, MAX_ATTEMPTS};
pub use reference::{references, InlineRef};

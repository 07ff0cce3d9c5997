//! Entry store for rcrt.
//!
//! A store is one directory holding `meta.json` (the mapping from entry id
//! to entry record) and a flat set of content files named after entry ids:
//! `<id>.txt` for article bodies, `<id>.<ext>` for images.
//!
//! # Design Rules
//!
//! 1. Ids are unique and never change once assigned.
//! 2. `meta.json` is always replaced atomically (temp file + rename).
//! 3. Mutations are serialized per store handle; reads take no lock.
//! 4. Content paths are confined to the store root.
//! 5. The generic update path only replaces existing records; new entries go
//!    through [`EntryStore::create_entry`].

pub mod atomic;
pub mod check;
pub mod error;
pub mod metadata;
mod paths;
pub mod seed;
pub mod store;

/// Name of the metadata file inside a store directory.
pub const META_FILE: &str = "meta.json";

pub use check::{CheckReport, DanglingRef};
pub use error::{StoreError, StoreResult};
pub use metadata::Metadata;
pub use seed::Seeded;
pub use store::EntryStore;

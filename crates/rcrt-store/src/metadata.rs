//! The `meta.json` mapping from [`EntryId`] to [`Entry`].
//!
//! [`Metadata`] keeps keys in file order so that rewriting the file after an
//! edit only touches the records that changed. Decoding rejects duplicate
//! keys, malformed ids and unknown entry tags.

use std::collections::HashSet;
use std::fmt;

use rcrt_types::{Entry, EntryId};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Insertion-ordered metadata mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(EntryId, Entry)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.position(id).map(|i| &self.entries[i].1)
    }

    /// Look up by raw string key.
    pub fn get_str(&self, id: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == id)
            .map(|(_, e)| e)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.position(id).is_some()
    }

    /// Insert or replace. A replaced record keeps its position.
    pub fn insert(&mut self, id: EntryId, entry: Entry) -> Option<Entry> {
        match self.position(&id) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, entry)),
            None => {
                self.entries.push((id, entry));
                None
            }
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntryId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntryId, &Entry)> {
        self.entries.iter().map(|(id, e)| (id, e))
    }

    /// Every id currently in use, for the identifier generator.
    pub fn key_set(&self) -> HashSet<EntryId> {
        self.ids().cloned().collect()
    }

    /// Encode as pretty JSON terminated by a newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == id)
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, entry) in &self.entries {
            map.serialize_entry(id, entry)?;
        }
        map.end()
    }
}

struct MetadataVisitor;

impl<'de> Visitor<'de> for MetadataVisitor {
    type Value = Metadata;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object mapping entry ids to entry records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Metadata, A::Error> {
        let mut meta = Metadata::new();
        let mut seen = HashSet::new();
        while let Some(id) = access.next_key::<EntryId>()? {
            if !seen.insert(id.clone()) {
                return Err(serde::de::Error::custom(format!("duplicate entry id {id}")));
            }
            let entry = access.next_value::<Entry>()?;
            meta.entries.push((id, entry));
        }
        Ok(meta)
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MetadataVisitor)
    }
}

//! Store consistency checks.

use rcrt_types::{references, Entry, EntryId};

use crate::error::StoreResult;
use crate::store::EntryStore;

/// An article body pointing at an id that is not in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingRef {
    pub article: EntryId,
    pub label: String,
    pub target: String,
}

/// Result of [`EntryStore::check`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub entries: usize,
    /// Article/image entries whose content file is absent, with the expected name.
    pub missing_content: Vec<(EntryId, String)>,
    pub dangling: Vec<DanglingRef>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.missing_content.is_empty() && self.dangling.is_empty()
    }
}

impl EntryStore {
    /// Verify that content files exist and article references resolve.
    pub fn check(&self) -> StoreResult<CheckReport> {
        let meta = self.load()?;
        let mut report = CheckReport {
            entries: meta.len(),
            ..CheckReport::default()
        };

        for (id, entry) in meta.iter() {
            let Some(name) = entry.content_file(id) else {
                continue;
            };
            let bytes = match self.read_content(&name) {
                Ok(bytes) => bytes,
                Err(_) => {
                    report.missing_content.push((id.clone(), name));
                    continue;
                }
            };
            if !matches!(entry, Entry::Article { .. }) {
                continue;
            }
            let text = String::from_utf8_lossy(&bytes);
            for r in references(&text) {
                if meta.get_str(&r.id).is_none() {
                    report.dangling.push(DanglingRef {
                        article: id.clone(),
                        label: r.label,
                        target: r.id,
                    });
                }
            }
        }

        if !report.is_clean() {
            tracing::warn!(
                missing = report.missing_content.len(),
                dangling = report.dangling.len(),
                "store check found problems"
            );
        }
        Ok(report)
    }
}

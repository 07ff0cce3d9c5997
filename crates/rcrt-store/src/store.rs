use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rcrt_types::{references, Entry, EntryId};
use serde_json::{Map, Value};

use crate::atomic::write_atomic;
use crate::error::{StoreError, StoreResult};
use crate::metadata::Metadata;
use crate::paths::{confine, normalize, resolve_existing};
use crate::META_FILE;

/// A timeline store rooted at one directory.
///
/// Holds `meta.json` plus one content file per article or image entry. Every
/// mutating operation is a single load-mutate-save transaction taken under
/// the store's write lock, so concurrent edits through one handle never lose
/// updates. Reads take no lock.
#[derive(Debug)]
pub struct EntryStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl EntryStore {
    fn at(root: PathBuf) -> Self {
        Self {
            root,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a new, empty store. Fails if anything already exists at `path`.
    pub fn create(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(StoreError::AlreadyExists(path.to_path_buf()));
        }
        fs::create_dir_all(path)?;
        let store = Self::at(path.to_path_buf());
        store.save(&Metadata::new())?;
        tracing::info!(path = %path.display(), "created store");
        Ok(store)
    }

    /// Open an existing store. The metadata file must be present.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let store = Self::at(path.as_ref().to_path_buf());
        if !store.meta_path().is_file() {
            return Err(StoreError::CorruptStore {
                path: store.meta_path(),
                reason: "metadata file is missing".into(),
            });
        }
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta_path(&self) -> PathBuf {
        self.root.join(META_FILE)
    }

    /// Read and decode `meta.json`.
    pub fn load(&self) -> StoreResult<Metadata> {
        let path = self.meta_path();
        let bytes = fs::read(&path).map_err(|e| StoreError::CorruptStore {
            path: path.clone(),
            reason: if e.kind() == ErrorKind::NotFound {
                "metadata file is missing".into()
            } else {
                e.to_string()
            },
        })?;
        Metadata::from_json(&bytes).map_err(|e| StoreError::CorruptStore {
            path,
            reason: e.to_string(),
        })
    }

    /// Replace `meta.json` with `meta`, atomically.
    pub fn save(&self, meta: &Metadata) -> StoreResult<()> {
        let json = meta
            .to_json()
            .map_err(|e| StoreError::Internal(format!("encode metadata: {e}")))?;
        write_atomic(&self.meta_path(), json.as_bytes())?;
        tracing::debug!(entries = meta.len(), "saved metadata");
        Ok(())
    }

    /// Replace whole records for ids that already exist.
    ///
    /// Every key must name an existing entry and every value must be a valid
    /// entry record whose content file (if its kind has one) is already on
    /// disk; otherwise nothing is written. Each record is replaced
    /// wholesale: fields absent from the update are dropped.
    pub fn update_metadata_fields(&self, update: Map<String, Value>) -> StoreResult<Vec<EntryId>> {
        let _guard = self.lock()?;
        let mut meta = self.load()?;

        let mut replacements = Vec::with_capacity(update.len());
        for (key, value) in update {
            let id = EntryId::parse(&key).map_err(|_| StoreError::UnknownKey(key.clone()))?;
            if !meta.contains(&id) {
                return Err(StoreError::UnknownKey(key));
            }
            let entry: Entry =
                serde_json::from_value(value).map_err(|e| StoreError::InvalidRecord {
                    id: key,
                    reason: e.to_string(),
                })?;
            validate_entry(&id, &entry)?;
            if let Some(name) = entry.content_file(&id) {
                if !self.root.join(&name).is_file() {
                    return Err(StoreError::InvalidRecord {
                        id: id.to_string(),
                        reason: format!("content file {name} does not exist"),
                    });
                }
            }
            replacements.push((id, entry));
        }

        let updated: Vec<EntryId> = replacements.iter().map(|(id, _)| id.clone()).collect();
        for (id, entry) in replacements {
            meta.insert(id, entry);
        }
        self.save(&meta)?;
        tracing::info!(count = updated.len(), "updated metadata records");
        Ok(updated)
    }

    /// Write raw bytes to a file under the store root.
    ///
    /// The path must stay inside the root and cannot be `meta.json`. When the
    /// file is the body of an existing article (`<id>.txt`), every inline
    /// reference in it must resolve to an entry in this store.
    pub fn write_content_file(&self, relative: &str, bytes: &[u8]) -> StoreResult<PathBuf> {
        let _guard = self.lock()?;
        let target = confine(&self.root, relative)?;

        if let Some(id) = article_body_id(&normalize(relative)?) {
            let meta = self.load()?;
            if matches!(meta.get(&id), Some(Entry::Article { .. })) {
                check_references(&meta, relative, bytes)?;
            }
        }

        write_atomic(&target, bytes)?;
        tracing::debug!(path = relative, bytes = bytes.len(), "wrote content file");
        Ok(target)
    }

    /// Read a content file under the store root.
    pub fn read_content(&self, relative: &str) -> StoreResult<Vec<u8>> {
        Ok(fs::read(resolve_existing(&self.root, relative)?)?)
    }

    /// Add a new entry under a freshly generated id.
    ///
    /// Article and image entries get their content file written first
    /// (empty when `content` is `None`), then the metadata is saved.
    pub fn create_entry(&self, entry: Entry, content: Option<&[u8]>) -> StoreResult<EntryId> {
        let _guard = self.lock()?;
        self.insert_new(entry, content)
    }

    /// Create-entry body, for callers that already hold the write lock.
    pub(crate) fn insert_new(&self, entry: Entry, content: Option<&[u8]>) -> StoreResult<EntryId> {
        let mut meta = self.load()?;
        let id = EntryId::generate(&meta.key_set())?;
        validate_entry(&id, &entry)?;

        if let Some(name) = entry.content_file(&id) {
            let bytes = content.unwrap_or_default();
            if matches!(entry, Entry::Article { .. }) {
                // The new id may be referenced by its own body.
                let mut with_self = meta.clone();
                with_self.insert(id.clone(), entry.clone());
                check_references(&with_self, &name, bytes)?;
            }
            write_atomic(&confine(&self.root, &name)?, bytes)?;
        }

        meta.insert(id.clone(), entry);
        self.save(&meta)?;
        tracing::info!(%id, "created entry");
        Ok(id)
    }

    pub(crate) fn lock(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| StoreError::Internal(format!("lock poisoned: {e}")))
    }
}

/// `abc123.txt` -> `abc123`, for top-level paths that could be an article body.
fn article_body_id(clean: &Path) -> Option<EntryId> {
    if clean.components().count() != 1 {
        return None;
    }
    let stem = clean.to_str()?.strip_suffix(".txt")?;
    EntryId::parse(stem).ok()
}

fn check_references(meta: &Metadata, file: &str, bytes: &[u8]) -> StoreResult<()> {
    let text = String::from_utf8_lossy(bytes);
    let mut seen = HashSet::new();
    let missing: Vec<String> = references(&text)
        .into_iter()
        .filter(|r| meta.get_str(&r.id).is_none() && seen.insert(r.id.clone()))
        .map(|r| r.id)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StoreError::DanglingReference {
            file: file.to_string(),
            missing,
        })
    }
}

/// Field-level checks the type system does not cover.
fn validate_entry(id: &EntryId, entry: &Entry) -> StoreResult<()> {
    if let Entry::Image { ext } = entry {
        let ok = !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric());
        if !ok {
            return Err(StoreError::InvalidRecord {
                id: id.to_string(),
                reason: format!("image extension {ext:?} must be 1-10 ASCII alphanumerics"),
            });
        }
    }
    Ok(())
}

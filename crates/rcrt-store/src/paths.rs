//! Resolution of caller-supplied content paths inside a store root.

use std::path::{Component, Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::META_FILE;

fn invalid(path: &str, reason: &str) -> StoreError {
    StoreError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Lexically normalize `relative`: only plain components, `.` dropped.
pub(crate) fn normalize(relative: &str) -> StoreResult<PathBuf> {
    if relative.is_empty() {
        return Err(invalid(relative, "empty path"));
    }
    let mut clean = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid(relative, "escapes the store root")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid(relative, "must be relative to the store root"))
            }
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(invalid(relative, "names the store root itself"));
    }
    Ok(clean)
}

/// Resolve `relative` to a writable location confined to `root`.
///
/// The parent directory must already exist. Symlinked directories are
/// followed before the containment check, so a link pointing out of the
/// store is rejected. `meta.json` is reserved for metadata updates.
pub(crate) fn confine(root: &Path, relative: &str) -> StoreResult<PathBuf> {
    let clean = normalize(relative)?;
    if clean == Path::new(META_FILE) {
        return Err(invalid(relative, "meta.json is only changed through metadata updates"));
    }

    let canonical_root = root.canonicalize()?;
    let joined = canonical_root.join(&clean);
    let (Some(parent), Some(name)) = (joined.parent(), joined.file_name()) else {
        return Err(invalid(relative, "no file name"));
    };
    let parent = parent
        .canonicalize()
        .map_err(|_| invalid(relative, "parent directory does not exist"))?;
    if !parent.starts_with(&canonical_root) {
        return Err(invalid(relative, "escapes the store root"));
    }
    Ok(parent.join(name))
}

/// Resolve `relative` to an existing file confined to `root`.
///
/// Every symlink on the way is followed before the containment check. A
/// missing file surfaces as the underlying I/O error.
pub(crate) fn resolve_existing(root: &Path, relative: &str) -> StoreResult<PathBuf> {
    let clean = normalize(relative)?;
    let canonical_root = root.canonicalize()?;
    let resolved = canonical_root.join(&clean).canonicalize()?;
    if !resolved.starts_with(&canonical_root) {
        return Err(invalid(relative, "escapes the store root"));
    }
    Ok(resolved)
}

//! Atomic file replacement.
//!
//! Content goes to a temp file in the target's directory, is flushed and
//! synced, then renamed over the target. Readers see either the old file or
//! the new one. The temp file is removed if any step fails.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory"))?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta.json");
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "initial").unwrap();
        write_atomic(&path, b"updated").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "updated");
    }

    #[test]
    fn leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        write_atomic(&dir.path().join("a.txt"), b"x").unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn fails_without_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("a.txt");
        assert!(write_atomic(&path, b"x").is_err());
    }
}

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use todsim_chat::{KeyValueStore, StoreError};

/// Keys map one-to-one onto file names; `%` itself is escaped
const FILE_NAME_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// Key-value store with one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the store directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = Self::expand_tilde(dir.as_ref())?;

        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create store directory: {}", dir.display()))?;
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Expand ~ to home directory
    fn expand_tilde(path: &Path) -> Result<PathBuf> {
        let path_str = path.to_string_lossy();
        if let Some(rest) = path_str.strip_prefix("~/") {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            Ok(PathBuf::from(home).join(rest))
        } else if path_str == "~" {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            Ok(PathBuf::from(home))
        } else {
            Ok(path.to_path_buf())
        }
    }

    /// File backing a key; anything outside `[A-Za-z0-9_-]` is percent-encoded
    fn path_for(&self, key: &str) -> PathBuf {
        let name = utf8_percent_encode(key, FILE_NAME_ESCAPES);
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| StoreError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path()).unwrap();

        store.save("tod_messages_abc123", "[]").unwrap();

        assert!(temp.path().join("tod_messages_abc123.json").exists());
        assert_eq!(store.load("tod_messages_abc123").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_missing_key_is_none() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path()).unwrap();
        assert_eq!(store.load("tod_state_nobody").unwrap(), None);
    }

    #[test]
    fn test_creates_nested_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        let store = FileStore::new(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[test]
    fn test_keys_cannot_escape_directory() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path()).unwrap();

        store.save("tod_state_../../etc/passwd", "{}").unwrap();

        assert!(temp
            .path()
            .join("tod_state_%2E%2E%2F%2E%2E%2Fetc%2Fpasswd.json")
            .exists());
        assert_eq!(
            store.load("tod_state_../../etc/passwd").unwrap(),
            Some("{}".to_string())
        );
    }

    #[test]
    fn test_similar_keys_do_not_collide() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path()).unwrap();

        store.save("tod_messages_a.b", "[1]").unwrap();
        store.save("tod_messages_a_b", "[2]").unwrap();
        store.save("tod_messages_a%2Eb", "[3]").unwrap();

        assert_eq!(store.load("tod_messages_a.b").unwrap(), Some("[1]".to_string()));
        assert_eq!(store.load("tod_messages_a_b").unwrap(), Some("[2]".to_string()));
        assert_eq!(store.load("tod_messages_a%2Eb").unwrap(), Some("[3]".to_string()));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path()).unwrap();
        fs::remove_dir_all(temp.path()).unwrap();

        let err = store.save("tod_state_abc123", "{}").unwrap_err();
        assert!(matches!(err, StoreError::Write { ref key, .. } if key == "tod_state_abc123"));
    }
}

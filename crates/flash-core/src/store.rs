//! Session-scoped draft persistence.
//!
//! The persistence medium is a synchronous key-value string store behind
//! [`SessionStore`]; the draft lives under one fixed key. [`DraftStore`]
//! layers serde on top with the durability contract the wizard needs:
//! corrupt or unreadable payloads degrade to an empty draft, writes are
//! fire-and-forget, and a structurally empty draft removes the entry
//! instead of persisting an empty object.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::draft::Draft;

/// The single key the in-progress draft is stored under.
pub const DRAFT_KEY: &str = "flash_request_draft";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove {path}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Synchronous key-value string storage scoped to one session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under a session directory, written atomically via
/// tmp + rename.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value.as_bytes()).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Write { path, source })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Remove { path, source }),
        }
    }
}

/// Keys become file names; escape anything that isn't filesystem-safe.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        let is_safe = byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_';
        if is_safe {
            encoded.push(char::from(byte));
        } else {
            push_percent_encoded_byte(&mut encoded, byte);
        }
    }
    encoded
}

fn push_percent_encoded_byte(buffer: &mut String, byte: u8) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    buffer.push('%');
    buffer.push(char::from(HEX[(byte >> 4) as usize]));
    buffer.push(char::from(HEX[(byte & 0x0F) as usize]));
}

/// Draft projection over a [`SessionStore`].
///
/// All failures are logged and swallowed: a broken store must never block
/// the user flow.
#[derive(Debug, Clone)]
pub struct DraftStore<S> {
    inner: S,
}

impl<S: SessionStore> DraftStore<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Read the persisted draft. Missing, unreadable, or corrupt payloads
    /// all come back as an empty draft.
    #[must_use]
    pub fn load(&self) -> Draft {
        let raw = match self.inner.get(DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Draft::default(),
            Err(err) => {
                warn!(error = %err, "failed to read persisted draft; starting empty");
                return Draft::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "persisted draft is corrupt; starting empty");
            Draft::default()
        })
    }

    /// Write through the current draft, or drop the entry entirely when the
    /// draft is structurally empty.
    pub fn save(&mut self, draft: &Draft) {
        if draft.is_empty() {
            if let Err(err) = self.inner.remove(DRAFT_KEY) {
                warn!(error = %err, "failed to remove persisted draft");
            }
            return;
        }

        match serde_json::to_string(draft) {
            Ok(raw) => {
                if let Err(err) = self.inner.set(DRAFT_KEY, &raw) {
                    warn!(error = %err, "failed to persist draft");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize draft"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;

    fn sample_draft() -> Draft {
        Draft {
            description: "charger at CULC 5pm".into(),
            category: Category::Electronics,
            when: Some("5pm".into()),
            where_: Some("CULC 5pm".into()),
        }
    }

    #[test]
    fn memory_round_trip() {
        let mut store = DraftStore::new(MemoryStore::default());
        store.save(&sample_draft());
        assert_eq!(store.load(), sample_draft());
    }

    #[test]
    fn empty_draft_removes_entry() {
        let mut inner = MemoryStore::default();
        inner.set(DRAFT_KEY, "{}").expect("seed");
        let mut store = DraftStore::new(inner);

        store.save(&Draft::default());
        assert_eq!(store.load(), Draft::default());
    }

    #[test]
    fn missing_entry_loads_empty() {
        let store = DraftStore::new(MemoryStore::default());
        assert_eq!(store.load(), Draft::default());
    }

    #[test]
    fn corrupt_payload_is_swallowed() {
        let mut inner = MemoryStore::default();
        inner.set(DRAFT_KEY, "{not json").expect("seed");
        let store = DraftStore::new(inner);
        assert_eq!(store.load(), Draft::default());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = DraftStore::new(FileStore::new(dir.path()));

        store.save(&sample_draft());
        assert_eq!(store.load(), sample_draft());

        // A fresh store over the same directory sees the same draft.
        let reopened = DraftStore::new(FileStore::new(dir.path()));
        assert_eq!(reopened.load(), sample_draft());
    }

    #[test]
    fn file_store_removes_on_empty_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = DraftStore::new(FileStore::new(dir.path()));

        store.save(&sample_draft());
        store.save(&Draft::default());

        assert_eq!(store.load(), Draft::default());
        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .collect::<Result<_, _>>()
            .expect("entries");
        assert!(entries.is_empty(), "entry file should be gone");
    }

    #[test]
    fn file_store_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut inner = FileStore::new(dir.path());
        inner.set(DRAFT_KEY, "garbage").expect("seed");

        let store = DraftStore::new(inner);
        assert_eq!(store.load(), Draft::default());
    }

    #[test]
    fn keys_are_filesystem_safe() {
        assert_eq!(encode_key("flash_request_draft"), "flash_request_draft");
        assert_eq!(encode_key("a/b c"), "a%2Fb%20c");
    }
}

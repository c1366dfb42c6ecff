use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

/// Preference key: contact-info sidebar visibility
pub const PREF_CONTACT_INFO_OPEN: &str = "contactInfoSidebarOpen";
/// Preference key: chat sidebar expanded/collapsed
pub const PREF_CHAT_SIDEBAR_EXPANDED: &str = "chatSidebarExpanded";
/// Preference key: secondary sidebar hidden
pub const PREF_SECONDARY_SIDEBAR_HIDDEN: &str = "secondarySidebarHidden";

/// Flat string-to-string store persisted as a JSON file.
///
/// Plays the role browser local storage plays for the dashboard: every
/// mutating call rewrites the whole file so independent writers can never
/// interleave partial records. A store without a backing path lives purely
/// in memory (used by tests and as the degraded mode when the data dir is
/// unavailable).
#[derive(Debug, Default)]
pub struct KvStore {
    path: Option<PathBuf>,
    map: BTreeMap<String, String>,
}

impl KvStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// A missing file yields an empty store; a malformed file is logged
    /// and treated as empty rather than failing startup.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating store directory {}", parent.display()))?;
        }

        let map = match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), %err, "store file unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading store file {}", path.display()));
            }
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            map,
        })
    }

    /// In-memory store with no backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or overwrite `key` and persist the whole store.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.map.insert(key.to_string(), value.into());
        self.flush()
    }

    /// Remove `key` (if present) and persist the whole store.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.map.remove(key).is_some() {
            return self.flush();
        }
        Ok(())
    }

    /// Read a boolean preference stored as "true"/"false".
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    /// Store a boolean preference; a failed write is logged and swallowed,
    /// the in-memory value stays correct either way.
    pub fn set_flag(&mut self, key: &str, value: bool) {
        let text = if value { "true" } else { "false" };
        if let Err(err) = self.set(key, text) {
            warn!(key, %err, "preference write failed");
        }
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let body = serde_json::to_string_pretty(&self.map).context("serializing store")?;
        fs::write(path, body)
            .with_context(|| format!("writing store file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = KvStore::open(&dir.path().join("storage.json")).unwrap();
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        let mut store = KvStore::open(&path).unwrap();
        store.set("greeting", "hello").unwrap();

        let reopened = KvStore::open(&path).unwrap();
        assert_eq!(reopened.get("greeting"), Some("hello"));
    }

    #[test]
    fn remove_deletes_key() {
        let mut store = KvStore::in_memory();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
    }

    #[test]
    fn malformed_file_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = KvStore::open(&path).unwrap();
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn flag_helpers_round_trip() {
        let mut store = KvStore::in_memory();
        assert_eq!(store.get_flag(PREF_CONTACT_INFO_OPEN), None);
        store.set_flag(PREF_CONTACT_INFO_OPEN, true);
        assert_eq!(store.get_flag(PREF_CONTACT_INFO_OPEN), Some(true));
        store.set_flag(PREF_CONTACT_INFO_OPEN, false);
        assert_eq!(store.get_flag(PREF_CONTACT_INFO_OPEN), Some(false));
    }
}

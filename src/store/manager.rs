//! Key-value store persisted to disk
//!
//! Provides a `Store` that keeps serializable values as JSON files, one file
//! per key, each stamped with the time it was saved.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wrapper struct for values stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry<T> {
    /// The stored value
    data: T,
    /// When the value was saved
    saved_at: DateTime<Utc>,
}

/// Result of reading from the store
#[derive(Debug)]
pub struct StoredData<T> {
    /// The stored value
    pub data: T,
    /// When the value was saved
    pub saved_at: DateTime<Utc>,
}

/// Reads and writes JSON documents in a directory
///
/// The default location is the XDG data directory (`~/.local/share/weatherlens/`
/// on Linux). Unreadable or malformed entries read as missing.
#[derive(Debug, Clone)]
pub struct Store {
    /// Directory where entries are stored
    dir: PathBuf,
}

impl Store {
    /// Creates a Store in the XDG-compliant data directory
    ///
    /// Returns `None` if the data directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "weatherlens")?;
        Some(Self {
            dir: project_dirs.data_dir().to_path_buf(),
        })
    }

    /// Creates a Store in a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Writes `data` under `key`, replacing any previous value
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let entry = StoredEntry {
            data,
            saved_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        debug!("Writing store entry {}", key);
        fs::write(self.entry_path(key), json)
    }

    /// Reads the value stored under `key`
    ///
    /// Returns `None` if the entry doesn't exist or cannot be parsed.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<StoredData<T>> {
        let content = fs::read_to_string(self.entry_path(key)).ok()?;
        let entry: StoredEntry<T> = serde_json::from_str(&content).ok()?;

        Some(StoredData {
            data: entry.data,
            saved_at: entry.saved_at,
        })
    }
}

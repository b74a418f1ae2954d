//! JSON file-based settings backend.
//!
//! This module provides a simple, human-readable settings implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - loads entire file into memory once
//! - **Write**: O(n) - serializes and writes the whole map
//! - **Best for**: a handful of keys with infrequent writes, which is exactly
//!   what the engine persists

use crate::domain::error::{Result, TradesiteError};
use crate::storage::backend::SettingsStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// JSON settings container format.
///
/// This is the top-level structure serialized to disk. Wraps the value map in
/// a single object for better JSON structure and future extensibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsData {
    /// Version of the settings format for future migrations.
    version: u32,

    /// All stored key/value pairs.
    #[serde(default)]
    values: HashMap<String, String>,

    /// Unix timestamp of the last successful save.
    #[serde(default)]
    updated_at: i64,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            version: 1,
            values: HashMap::new(),
            updated_at: 0,
        }
    }
}

/// JSON file settings backend.
///
/// Stores settings in a human-readable JSON file with atomic writes. The
/// entire map is kept in memory and persisted on every modification.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. Shared access goes through
/// [`crate::storage::GuardedSettings`], which fronts it with a mutex.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "values": {
///     "site_mode": "gold"
///   },
///   "updated_at": 1234567890
/// }
/// ```
pub struct JsonSettings {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: SettingsData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonSettings {
    /// Creates or opens a JSON settings backend.
    ///
    /// If the file exists, loads existing data. Otherwise starts with an empty
    /// map. Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tradesite::storage::JsonSettings;
    /// use std::path::PathBuf;
    ///
    /// let settings = JsonSettings::new(PathBuf::from("/tmp/settings.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON settings");

        if let Some(parent) = file_path.parent() {
            tracing::debug!(parent = ?parent, "creating parent directory");
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            tracing::debug!("loading existing settings");
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty settings");
            SettingsData::default()
        };

        tracing::debug!(key_count = data.values.len(), "settings initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Loads settings data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    fn load_from_file(path: &PathBuf) -> Result<SettingsData> {
        let contents = std::fs::read_to_string(path)?;
        let data: SettingsData = serde_json::from_str(&contents)
            .map_err(|e| TradesiteError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            keys = data.values.len(),
            "loaded settings data"
        );

        Ok(data)
    }

    /// Saves settings data to disk using atomic write.
    ///
    /// Writes to a temporary file first, then atomically renames it to the
    /// target path. This ensures the file is never left in a corrupt state,
    /// even if the process crashes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - JSON serialization fails (should never happen with valid data)
    /// - Temporary file cannot be written
    /// - Rename operation fails (rare on POSIX systems)
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        tracing::debug!(path = ?self.file_path, "saving settings data");

        self.data.updated_at = chrono::Utc::now().timestamp();
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| TradesiteError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!("settings saved successfully");
        Ok(())
    }
}

impl SettingsStore for JsonSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.data.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("settings_set", key = %key).entered();

        self.data.values.insert(key.to_string(), value.to_string());
        self.dirty = true;
        self.save_to_file()?;

        tracing::debug!("setting stored");
        Ok(())
    }
}

impl Drop for JsonSettings {
    /// Ensures data is saved on drop, even if a save was interrupted earlier.
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty settings on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

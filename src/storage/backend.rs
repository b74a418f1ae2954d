//! Settings backend abstraction.
//!
//! This module defines the [`SettingsStore`] trait that abstracts over different
//! persistence backends for the site's key/value settings. This allows seamless
//! switching between storage implementations without changing business logic.
//!
//! # Design Philosophy
//!
//! The trait is designed to be minimal and focused on the actual operations needed
//! by the engine, not a generic configuration framework. Settings are small string
//! pairs (the display mode being the load-bearing one), so the interface is a plain
//! get/set surface.

use crate::domain::error::Result;

/// Abstraction over persistent settings backends.
///
/// Implementations hold a flat string-to-string map. Write protection for the
/// display-mode key is not a backend concern; it lives in the guarded wrapper
/// that fronts every shared handle (see [`crate::storage::GuardedSettings`]).
///
/// # Implementations
///
/// - [`JsonSettings`]: Uses a JSON file with atomic writes (default)
///
/// # Examples
///
/// ```no_run
/// use tradesite::storage::{JsonSettings, SettingsStore};
/// use std::path::PathBuf;
///
/// let mut settings = JsonSettings::new(PathBuf::from("/tmp/settings.json"))?;
/// settings.set("site_mode", "silver")?;
/// assert_eq!(settings.get("site_mode").as_deref(), Some("silver"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// [`JsonSettings`]: crate::storage::JsonSettings
pub trait SettingsStore: Send {
    /// Retrieves the value stored under `key`.
    ///
    /// Returns `None` when the key has never been written.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, persisting the change immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

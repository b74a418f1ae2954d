//! Guarded persistence for the display-mode setting.
//!
//! The settings file is shared infrastructure: any component may keep small
//! key/value pairs in it. The display mode is special because third-party
//! snippets on the original site kept overwriting it, so every shared handle
//! goes through [`GuardedSettings`], which drops writes to the mode key unless
//! they come from [`ModeStore`]'s own write path. The guard is enforced for
//! the lifetime of the process; it does not attempt cross-process protection.
//!
//! Mode changes are announced on a broadcast channel so interested tasks (the
//! article-cache reload listener, a host's navigation handler) can react
//! without polling the store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::domain::error::Result;
use crate::domain::SiteMode;
use crate::storage::backend::SettingsStore;

/// Settings key holding the persisted display mode.
pub const MODE_KEY: &str = "site_mode";

/// Buffered mode-change events per subscriber.
const MODE_EVENTS_CAPACITY: usize = 16;

/// A shared settings handle that write-protects the display-mode key.
///
/// Wraps the backing [`SettingsStore`] behind a mutex and an authority flag.
/// Writes to [`MODE_KEY`] succeed only while the flag is raised, which happens
/// exclusively inside [`ModeStore`]'s own operations; every other attempt is
/// silently dropped with a warning. All other keys pass straight through.
///
/// The flag is not a lock. It is raised and cleared around the one legitimate
/// write call site, so a racing unauthorized write can in principle slip into
/// that window; the protection targets well-meaning but misbehaving in-process
/// code, not adversaries.
pub struct GuardedSettings {
    /// The backing store; boxed so tests can substitute their own backend.
    inner: Mutex<Box<dyn SettingsStore>>,

    /// Raised only while the mode store performs its own write.
    authority: AtomicBool,
}

impl GuardedSettings {
    fn new(backend: Box<dyn SettingsStore>) -> Self {
        Self {
            inner: Mutex::new(backend),
            authority: AtomicBool::new(false),
        }
    }

    /// Retrieves the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key)
    }

    /// Stores `value` under `key`, subject to the mode-key guard.
    ///
    /// An unauthorized write to [`MODE_KEY`] is dropped and reported as
    /// success so misbehaving callers cannot distinguish it from a real
    /// write; a warning records the attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to persist the value.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        if key == MODE_KEY && !self.authority.load(Ordering::SeqCst) {
            tracing::warn!(key = %key, attempted = %value, "unauthorized write to protected key dropped");
            return Ok(());
        }
        self.inner.lock().set(key, value)
    }

    /// Writes through the guard with the authority flag raised.
    fn authorized_set(&self, key: &str, value: &str) -> Result<()> {
        self.authority.store(true, Ordering::SeqCst);
        let result = self.set(key, value);
        self.authority.store(false, Ordering::SeqCst);
        result
    }
}

/// Owner of the persisted display mode.
///
/// All legitimate mode mutations go through this type: the first-run default
/// in [`initialize_default`](Self::initialize_default) and the user-facing
/// flip in [`switch`](Self::switch). Reads never fail; an absent or mangled
/// stored value resolves to gold.
pub struct ModeStore {
    shared: Arc<GuardedSettings>,
    changes: broadcast::Sender<SiteMode>,
}

impl ModeStore {
    /// Creates a mode store owning the given settings backend.
    #[must_use]
    pub fn new(backend: Box<dyn SettingsStore>) -> Self {
        let (changes, _) = broadcast::channel(MODE_EVENTS_CAPACITY);
        Self {
            shared: Arc::new(GuardedSettings::new(backend)),
            changes,
        }
    }

    /// Returns the shared settings handle components use for their own keys.
    ///
    /// Every consumer of the settings file gets this guarded handle; nothing
    /// else holds the raw backend.
    #[must_use]
    pub fn settings(&self) -> Arc<GuardedSettings> {
        Arc::clone(&self.shared)
    }

    /// Reads the current display mode, defaulting to gold.
    #[must_use]
    pub fn mode(&self) -> SiteMode {
        match self.shared.get(MODE_KEY) {
            Some(value) => SiteMode::from_stored(&value),
            None => SiteMode::Gold,
        }
    }

    /// Ensures a mode value exists, writing the gold default on first run.
    ///
    /// An existing value is left untouched even when it is unrecognized; such
    /// values simply read as gold. Returns the effective mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the default cannot be persisted.
    pub fn initialize_default(&self) -> Result<SiteMode> {
        if let Some(value) = self.shared.get(MODE_KEY) {
            let mode = SiteMode::from_stored(&value);
            tracing::debug!(stored = %value, mode = ?mode, "display mode already initialized");
            return Ok(mode);
        }

        self.shared.authorized_set(MODE_KEY, SiteMode::Gold.as_str())?;
        tracing::info!(mode = ?SiteMode::Gold, "initialized default display mode");
        Ok(SiteMode::Gold)
    }

    /// Sets the display mode through the authorized write path.
    ///
    /// Subscribers are notified only when the value actually changed, and
    /// only after it is durably stored, so a listener reading the store sees
    /// the value it was told about.
    ///
    /// # Errors
    ///
    /// Returns an error if the new value cannot be persisted; no notification
    /// is sent in that case.
    pub fn set(&self, mode: SiteMode) -> Result<()> {
        let current = self.mode();
        self.shared.authorized_set(MODE_KEY, mode.as_str())?;

        if current != mode {
            tracing::info!(from = ?current, to = ?mode, "display mode changed");
            let _ = self.changes.send(mode);
        }
        Ok(())
    }

    /// Flips the display mode and announces the change.
    ///
    /// This is the user-facing switch gesture. Returns the mode now in
    /// effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the new value cannot be persisted; the stored mode
    /// is unchanged in that case.
    pub fn switch(&self) -> Result<SiteMode> {
        let next = self.mode().other();
        self.set(next)?;
        Ok(next)
    }

    /// Subscribes to mode-change announcements.
    ///
    /// Each subscriber receives every mode produced by [`switch`](Self::switch)
    /// after the subscription was created. Slow subscribers may observe a lag
    /// error and should simply resubscribe to the current state via
    /// [`mode`](Self::mode).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SiteMode> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::JsonSettings;

    fn store_in(dir: &tempfile::TempDir) -> ModeStore {
        let backend = JsonSettings::new(dir.path().join("settings.json")).unwrap();
        ModeStore::new(Box::new(backend))
    }

    #[test]
    fn first_run_defaults_to_gold_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.initialize_default().unwrap(), SiteMode::Gold);
        assert_eq!(store.settings().get(MODE_KEY).as_deref(), Some("gold"));
        assert_eq!(store.mode(), SiteMode::Gold);
    }

    #[test]
    fn existing_values_are_not_overwritten_on_initialize() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = store_in(&dir);
            store.switch().unwrap();
        }

        let store = store_in(&dir);
        assert_eq!(store.initialize_default().unwrap(), SiteMode::Silver);
        assert_eq!(store.settings().get(MODE_KEY).as_deref(), Some("silver"));
    }

    #[test]
    fn unrecognized_stored_values_read_as_gold_without_a_write() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut backend = JsonSettings::new(dir.path().join("settings.json")).unwrap();
            backend.set(MODE_KEY, "platinum").unwrap();
        }

        let store = store_in(&dir);
        assert_eq!(store.initialize_default().unwrap(), SiteMode::Gold);
        // The stored garbage stays; only reads are coerced.
        assert_eq!(store.settings().get(MODE_KEY).as_deref(), Some("platinum"));
    }

    #[test]
    fn switch_flips_between_the_two_modes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.initialize_default().unwrap();

        assert_eq!(store.switch().unwrap(), SiteMode::Silver);
        assert_eq!(store.mode(), SiteMode::Silver);
        assert_eq!(store.switch().unwrap(), SiteMode::Gold);
        assert_eq!(store.mode(), SiteMode::Gold);
    }

    #[test]
    fn unauthorized_mode_writes_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.initialize_default().unwrap();

        let settings = store.settings();
        settings.set(MODE_KEY, "silver").unwrap();

        assert_eq!(store.mode(), SiteMode::Gold);
        assert_eq!(settings.get(MODE_KEY).as_deref(), Some("gold"));
    }

    #[test]
    fn other_keys_pass_through_the_guard() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let settings = store.settings();
        settings.set("banner_dismissed", "true").unwrap();

        assert_eq!(settings.get("banner_dismissed").as_deref(), Some("true"));
    }

    #[test]
    fn switch_notifies_subscribers_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.initialize_default().unwrap();

        let mut changes = store.subscribe();
        store.switch().unwrap();
        store.switch().unwrap();

        assert_eq!(changes.try_recv().unwrap(), SiteMode::Silver);
        assert_eq!(changes.try_recv().unwrap(), SiteMode::Gold);
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn setting_the_current_mode_again_does_not_notify() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.initialize_default().unwrap();

        let mut changes = store.subscribe();
        store.set(SiteMode::Gold).unwrap();

        assert!(changes.try_recv().is_err());
    }
}

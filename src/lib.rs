//! Tradesite: a cached article search and display-mode engine.
//!
//! Tradesite powers the interactive pieces of a trading-news site front end:
//! - Article feed loading over HTTP with in-memory caching
//! - Mode-scoped content filtering (gold vs. silver editions)
//! - Debounced, per-surface search with panel view models
//! - Persisted display mode behind a guarded settings store
//! - A reconciliation loop that corrects presentation drift
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Console Harness (main.rs)                          │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Engine (lib.rs)                                    │  ← Wiring
//! │  - Configuration loading                            │  ← Lifecycle
//! │  - Background task supervision                      │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ App Layer     │   │ Content Layer │   │ Reconcile     │
//! │ (app/)        │   │ (content/)    │   │ (reconcile/)  │
//! │ - Debounce    │   │ - HTTP fetch  │   │ - Mode drift  │
//! │ - Panels      │   │ - Caching     │   │ - Switch label│
//! │ - Commands    │   │ - Filtering   │   │ - 100ms loop  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Search, Storage, Domain & Infrastructure Layers    │
//! │  - Pure snapshot search (search/)                   │
//! │  - Guarded JSON settings (storage/)                 │
//! │  - Articles, modes, errors, media (domain/)         │
//! │  - Platform paths (infrastructure/)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber setup                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Query controllers with debounce and panel view models
//! - [`content`]: Article fetching and the shared content cache
//! - [`search`]: Pure query evaluation over cache snapshots
//! - [`storage`]: JSON file persistence with a guarded mode store
//! - [`reconcile`]: Recurring display-mode enforcement
//! - [`domain`]: Core domain types (Article, SiteMode, errors)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`observability`]: Tracing subscriber initialization
//!
//! # Configuration
//!
//! The engine is configured via a TOML file:
//!
//! ```toml
//! # ~/.config/tradesite.toml
//! endpoint_url = "https://script.google.com/macros/s/AKfy.../exec"
//! site_base = "https://example.com/trade-gold"
//! data_dir = "~/.local/share/tradesite"
//! trace_level = "info"
//! ```
//!
//! All keys are optional; missing keys keep their defaults.
//!
//! # Initialization Flow
//!
//! 1. **Startup** (`main.rs` or embedding application):
//!    - Load [`Config`] from a TOML file or defaults
//!    - Initialize tracing (optional)
//!    - Call [`initialize`] to build the [`Engine`]
//!
//! 2. **Engine Start**:
//!    - Spawn the initial article fetch into the cache
//!    - Spawn the reconciliation loop against the presentation surface
//!    - Spawn the mode-change listener that reloads content on switches
//!
//! 3. **Query Handling**:
//!    - Each search surface gets its own [`QueryController`]
//!    - Gestures feed in as [`QueryEvent`]s, panel updates come back as
//!      [`SurfaceCommand`]s on the surface's channel
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use tradesite::{initialize, Config, PresentationSurface, QueryEvent, SiteMode};
//!
//! struct Console;
//!
//! impl PresentationSurface for Console {
//!     fn applied_mode(&self) -> Option<SiteMode> {
//!         None
//!     }
//!     fn apply_mode(&self, mode: SiteMode) {
//!         println!("mode: {}", mode.label());
//!     }
//!     fn set_switch_label(&self, label: &str) {
//!         println!("switch: {label}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> tradesite::Result<()> {
//!     let config = Config::default();
//!     let engine = initialize(&config)?;
//!     engine.start(Arc::new(Console));
//!
//!     let (sink, mut commands) = mpsc::unbounded_channel();
//!     let controller = engine.controller(sink);
//!     controller.handle(QueryEvent::Focused);
//!
//!     if let Some(command) = commands.recv().await {
//!         println!("{command:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Key Design Decisions
//!
//! ## Snapshot-Based Search
//!
//! The cache hands out immutable [`CacheSnapshot`]s backed by an `Arc`:
//! - Search never blocks a refresh and vice versa
//! - A snapshot taken before a refresh stays internally consistent
//! - The search function itself is pure and trivially testable
//!
//! ## Debounce as Aborted Tasks
//!
//! Each controller keeps at most one pending debounce task:
//! - New input aborts the previous task before spawning the next
//! - Only the final value of a burst ever reaches the search engine
//! - Clearing the field cancels the pending task outright
//!
//! ## Guarded Persistence plus Reconciliation
//!
//! The persisted mode key is writable only through the store's own path:
//! - Stray writes are dropped at the guard and logged
//! - The reconciliation loop re-applies the stored mode on drift
//! - The switch control's label is refreshed on every pass

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod content;
pub mod domain;
pub mod infrastructure;
pub mod reconcile;
pub mod search;
pub mod storage;

pub mod observability;

pub use app::{PanelState, QueryController, QueryEvent, ResultItem, SurfaceCommand};
pub use content::{ArticleFetcher, CacheSnapshot, ContentCache, HttpArticleFetcher};
pub use domain::{Article, Result, SiteMode, TradesiteError};
pub use reconcile::PresentationSurface;
pub use storage::ModeStore;

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use storage::JsonSettings;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// Feed endpoint used when no configuration overrides it.
const DEFAULT_ENDPOINT: &str =
    "https://script.google.com/macros/s/AKfycbzTIMUcEl49nXGRMQk_L_TI1XFD28gUNyMt0IXKVWnDiPnV5GorIEEPMswp-Gsv0r1Bhw/exec";

/// Engine configuration, loadable from a TOML file.
///
/// # Example
///
/// ```toml
/// endpoint_url = "https://feeds.example.com/articles"
/// site_base = "https://example.com/trade-gold"
/// data_dir = "~/.local/share/tradesite"
/// trace_level = "debug"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the JSON article feed.
    ///
    /// The endpoint may return either a bare array of articles or an object
    /// with an `articles` field. Default: the site's published feed.
    pub endpoint_url: String,

    /// Absolute site prefix detail URLs are built from.
    ///
    /// Article links open at `<site_base>/detail?id=<id>`. Default:
    /// `http://localhost/trade-gold`
    pub site_base: String,

    /// Directory holding persisted settings.
    ///
    /// A leading `~` expands to the home directory. Default: the platform
    /// data directory resolved by [`infrastructure::get_data_dir`].
    pub data_dir: Option<String>,

    /// Tracing level for log output.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Overridden by the
    /// `RUST_LOG` environment variable. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            site_base: "http://localhost/trade-gold".to_string(),
            data_dir: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Missing keys keep their [`Default`] values, so a partial file is
    /// valid. A leading `~` in `path` expands to the home directory.
    ///
    /// # Errors
    ///
    /// Returns [`TradesiteError::Io`] when the file cannot be read and
    /// [`TradesiteError::Config`] when its contents are not valid TOML.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tradesite::Config;
    ///
    /// let missing = Config::from_file("/nonexistent/tradesite.toml");
    /// assert!(missing.is_err());
    /// ```
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = infrastructure::expand_tilde(path);
        let raw = std::fs::read_to_string(&expanded)?;

        toml::from_str(&raw).map_err(|e| {
            TradesiteError::Config(format!("invalid configuration in {expanded}: {e}"))
        })
    }

    fn resolve_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(infrastructure::expand_tilde(dir)),
            None => infrastructure::get_data_dir(),
        }
    }
}

/// A wired engine: shared content cache, mode store, and task lifecycle.
///
/// Build one with [`initialize`], then call [`start`](Engine::start) inside
/// a tokio runtime. Dropping the engine stops its background tasks.
pub struct Engine {
    mode_store: Arc<ModeStore>,
    cache: Arc<ContentCache>,
    site_base: String,
    shutdown: CancellationToken,
}

impl Engine {
    /// Returns the shared mode store.
    #[must_use]
    pub fn mode_store(&self) -> Arc<ModeStore> {
        Arc::clone(&self.mode_store)
    }

    /// Returns the shared content cache.
    #[must_use]
    pub fn cache(&self) -> Arc<ContentCache> {
        Arc::clone(&self.cache)
    }

    /// Starts the engine's background tasks against a presentation surface.
    ///
    /// Spawns three tasks: the initial article fetch, the recurring mode
    /// enforcement loop, and a listener that reloads content whenever the
    /// stored mode changes. All of them stop when
    /// [`shutdown`](Engine::shutdown) is called or the engine is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, surface: Arc<dyn PresentationSurface>) {
        let cache = Arc::clone(&self.cache);
        let stop = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = stop.cancelled() => {}
                () = cache.refresh() => {}
            }
        });

        reconcile::spawn(
            Arc::clone(&self.mode_store),
            surface,
            self.shutdown.clone(),
        );

        let cache = Arc::clone(&self.cache);
        let mut changes = self.mode_store.subscribe();
        let stop = self.shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = stop.cancelled() => break,
                    received = changes.recv() => match received {
                        Ok(mode) => {
                            tracing::info!(mode = ?mode, "reloading content for new display mode");
                            cache.invalidate();
                            cache.refresh().await;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            // Only the latest mode matters; one reload catches up.
                            tracing::warn!(skipped, "mode listener lagged");
                            cache.invalidate();
                            cache.refresh().await;
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });

        tracing::debug!("engine background tasks started");
    }

    /// Creates a query controller for one search surface.
    ///
    /// Controllers are independent; each surface gets its own input mirror
    /// and debounce window while sharing the engine's content cache.
    #[must_use]
    pub fn controller(&self, sink: UnboundedSender<SurfaceCommand>) -> Arc<QueryController> {
        QueryController::new(Arc::clone(&self.cache), self.site_base.clone(), sink)
    }

    /// Stops all background tasks.
    pub fn shutdown(&self) {
        tracing::debug!("engine shutdown requested");
        self.shutdown.cancel();
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Builds an [`Engine`] from configuration.
///
/// Opens (or creates) the settings file under the configured data
/// directory, ensures a display mode is persisted, and wires the HTTP
/// fetcher into a fresh content cache. No background work starts until
/// [`Engine::start`] is called.
///
/// # Errors
///
/// Returns an error when the settings file cannot be opened or created,
/// when the default mode cannot be persisted, or when the HTTP client
/// fails to build.
///
/// # Example
///
/// ```no_run
/// use tradesite::{initialize, Config};
///
/// let engine = initialize(&Config::default())?;
/// assert!(!engine.cache().ready());
/// # Ok::<(), tradesite::TradesiteError>(())
/// ```
pub fn initialize(config: &Config) -> Result<Engine> {
    tracing::debug!(endpoint = %config.endpoint_url, "initializing tradesite engine");

    let data_dir = config.resolve_data_dir();
    let settings = JsonSettings::new(data_dir.join("settings.json"))?;
    let mode_store = Arc::new(ModeStore::new(Box::new(settings)));
    let mode = mode_store.initialize_default()?;
    tracing::info!(mode = ?mode, data_dir = %data_dir.display(), "engine state loaded");

    let fetcher = HttpArticleFetcher::new(config.endpoint_url.clone())?;
    let cache = Arc::new(ContentCache::new(Box::new(fetcher), Arc::clone(&mode_store)));

    Ok(Engine {
        mode_store,
        cache,
        site_base: config.site_base.clone(),
        shutdown: CancellationToken::new(),
    })
}

//! Application layer coordinating search surfaces.
//!
//! This module defines the interactive logic layer, sitting between a host's
//! input surfaces and the content/search layers. It implements the
//! event-driven flow that powers the search dropdowns.
//!
//! # Architecture
//!
//! Each surface follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → QueryEvent → QueryController → search over cache snapshot
//!                                   │
//!                                   └→ SurfaceCommand → host renderer
//! ```
//!
//! The controller owns the debounce timer and panel bookkeeping; the host
//! owns the markup and translates gestures into events.
//!
//! # Modules
//!
//! - [`events`]: Gestures a host feeds into a controller
//! - [`controller`]: Per-surface debounce and search orchestration
//! - [`panel`]: Renderable panel states and the outbound command enum
//!
//! # Example
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use tradesite::app::{QueryController, QueryEvent};
//! # use std::sync::Arc;
//! # use tradesite::content::ContentCache;
//! # fn engine_cache() -> Arc<ContentCache> { unimplemented!() }
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let controller = QueryController::new(engine_cache(), "https://example.com/trade-gold".to_string(), tx);
//! controller.handle(QueryEvent::InputChanged("gold".to_string()));
//! ```

pub mod controller;
pub mod events;
pub mod panel;

pub use controller::{QueryController, DEBOUNCE_WINDOW};
pub use events::QueryEvent;
pub use panel::{PanelState, ResultItem, SurfaceCommand, EMPTY_MESSAGE, LOADING_MESSAGE, RESULTS_HEADER};

//! Content layer: fetching and caching the article index.
//!
//! This module owns everything between the remote index endpoint and the
//! in-memory article set the rest of the engine reads. The fetcher is a
//! trait so the cache can be exercised without a network; the cache applies
//! normalization and mode filtering so consumers only ever see articles that
//! belong to the active display mode.
//!
//! # Modules
//!
//! - `fetcher`: The [`ArticleFetcher`] seam and its `reqwest` implementation
//! - `cache`: The mode-scoped [`ContentCache`] and its snapshots

pub mod cache;
pub mod fetcher;

pub use cache::{CacheSnapshot, ContentCache};
pub use fetcher::{ArticleFetcher, HttpArticleFetcher};

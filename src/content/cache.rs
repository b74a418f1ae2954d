//! Mode-scoped article cache.
//!
//! Holds the normalized, mode-filtered article set every search surface reads
//! from. Refreshes are whole-batch replacements: readers hold an `Arc` to the
//! previous batch and never observe a partially updated list. The readiness
//! flag latches true after the first refresh attempt regardless of outcome,
//! so "empty because nothing loaded yet" and "empty because the index has no
//! articles for this mode" stay distinguishable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::content::fetcher::ArticleFetcher;
use crate::domain::Article;
use crate::storage::ModeStore;

/// A point-in-time view of the cache.
///
/// Cloning is cheap; the article list is shared, not copied. A snapshot stays
/// internally consistent even while a refresh replaces the live set.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    /// The current mode's articles in upstream order.
    pub articles: Arc<Vec<Article>>,

    /// Whether at least one refresh attempt has completed.
    pub ready: bool,
}

struct CacheState {
    articles: Arc<Vec<Article>>,
    ready: bool,
}

/// The shared article cache.
///
/// One instance serves every controller in the process. All mutation goes
/// through [`refresh`](Self::refresh); readers only ever take snapshots.
pub struct ContentCache {
    fetcher: Box<dyn ArticleFetcher>,
    mode_store: Arc<ModeStore>,
    state: RwLock<CacheState>,

    /// Bumped by [`invalidate`](Self::invalidate); a refresh installs its
    /// result only when the generation it started under is still current.
    generation: AtomicU64,
}

impl ContentCache {
    /// Creates an empty, not-yet-ready cache.
    #[must_use]
    pub fn new(fetcher: Box<dyn ArticleFetcher>, mode_store: Arc<ModeStore>) -> Self {
        Self {
            fetcher,
            mode_store,
            state: RwLock::new(CacheState {
                articles: Arc::new(Vec::new()),
                ready: false,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns whether at least one refresh attempt has completed.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.state.read().ready
    }

    /// Takes a consistent snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot {
        let state = self.state.read();
        CacheSnapshot {
            articles: Arc::clone(&state.articles),
            ready: state.ready,
        }
    }

    /// Marks every in-flight refresh as superseded.
    ///
    /// Called when the display mode changes: a fetch that started under the
    /// old mode must not install articles filtered for it.
    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel);
        tracing::debug!(superseded = generation, "cache generation invalidated");
    }

    /// Fetches the index and installs the current mode's articles.
    ///
    /// Errors are absorbed here: a failed fetch installs an empty batch, so
    /// consumers see "ready with no data" rather than an error or a stale
    /// mix. Overlapping refreshes under the same generation are
    /// last-writer-wins; a refresh superseded by
    /// [`invalidate`](Self::invalidate) discards its batch but still latches
    /// readiness.
    pub async fn refresh(&self) {
        let mode = self.mode_store.mode();
        let generation = self.generation.load(Ordering::Acquire);
        tracing::debug!(mode = ?mode, generation, "refreshing article cache");

        let articles = match self.fetcher.fetch_articles().await {
            Ok(raw) => {
                let total = raw.len();
                let articles: Vec<Article> = raw
                    .iter()
                    .filter_map(Article::from_raw)
                    .filter(|article| article.belongs_to(mode))
                    .collect();
                tracing::info!(
                    total,
                    retained = articles.len(),
                    mode = ?mode,
                    "article index loaded"
                );
                articles
            }
            Err(e) => {
                tracing::warn!(error = %e, "article refresh failed; cache will serve no data");
                Vec::new()
            }
        };

        let mut state = self.state.write();
        if self.generation.load(Ordering::Acquire) == generation {
            state.articles = Arc::new(articles);
        } else {
            tracing::debug!(generation, "discarding refresh result from a superseded mode");
        }
        state.ready = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fetcher::ArticleFetcher;
    use crate::domain::error::{Result, TradesiteError};
    use crate::domain::RawArticle;
    use crate::storage::JsonSettings;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    fn raw(title: &str, link: &str) -> RawArticle {
        RawArticle {
            title: Some(json!(title)),
            link: Some(json!(link)),
            ..RawArticle::default()
        }
    }

    fn mode_store(dir: &tempfile::TempDir) -> Arc<ModeStore> {
        let backend = JsonSettings::new(dir.path().join("settings.json")).unwrap();
        let store = ModeStore::new(Box::new(backend));
        store.initialize_default().unwrap();
        Arc::new(store)
    }

    struct StaticFetcher(Vec<RawArticle>);

    #[async_trait]
    impl ArticleFetcher for StaticFetcher {
        async fn fetch_articles(&self) -> Result<Vec<RawArticle>> {
            Ok(self.0.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ArticleFetcher for FailingFetcher {
        async fn fetch_articles(&self) -> Result<Vec<RawArticle>> {
            Err(TradesiteError::Fetch("connection reset".to_string()))
        }
    }

    /// Completes only after the gate opens, signalling once the fetch started.
    struct GatedFetcher {
        started: Arc<Notify>,
        gate: Arc<Notify>,
        records: Vec<RawArticle>,
    }

    #[async_trait]
    impl ArticleFetcher for GatedFetcher {
        async fn fetch_articles(&self) -> Result<Vec<RawArticle>> {
            self.started.notify_one();
            self.gate.notified().await;
            Ok(self.records.clone())
        }
    }

    #[tokio::test]
    async fn refresh_retains_only_the_active_modes_articles() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher(vec![
            raw("Gold rises", "#gold-news/1"),
            raw("Silver falls", "#Silver-news/2"),
            raw("Untagged note", ""),
            raw("Shouty gold", "#GOLD/3"),
        ]);
        let cache = ContentCache::new(Box::new(fetcher), mode_store(&dir));

        assert!(!cache.ready());
        cache.refresh().await;

        let snapshot = cache.snapshot();
        assert!(snapshot.ready);
        let titles: Vec<&str> = snapshot.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Gold rises", "Shouty gold"]);
    }

    #[tokio::test]
    async fn titleless_records_are_dropped_before_filtering() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher(vec![
            RawArticle {
                link: Some(json!("#gold/1")),
                ..RawArticle::default()
            },
            raw("Kept", "#gold/2"),
        ]);
        let cache = ContentCache::new(Box::new(fetcher), mode_store(&dir));

        cache.refresh().await;
        assert_eq!(cache.snapshot().articles.len(), 1);
    }

    #[tokio::test]
    async fn failed_refreshes_still_latch_readiness() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ContentCache::new(Box::new(FailingFetcher), mode_store(&dir));

        cache.refresh().await;

        let snapshot = cache.snapshot();
        assert!(snapshot.ready);
        assert!(snapshot.articles.is_empty());
    }

    #[tokio::test]
    async fn snapshots_are_stable_across_refreshes() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher(vec![raw("Gold rises", "#gold/1")]);
        let cache = ContentCache::new(Box::new(fetcher), mode_store(&dir));

        cache.refresh().await;
        let before = cache.snapshot();
        cache.refresh().await;

        // The earlier snapshot still sees its own batch.
        assert_eq!(before.articles.len(), 1);
        assert_eq!(cache.snapshot().articles.len(), 1);
    }

    #[tokio::test]
    async fn mid_flight_mode_switch_discards_the_stale_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = mode_store(&dir);
        let started = Arc::new(Notify::new());
        let gate = Arc::new(Notify::new());
        let fetcher = GatedFetcher {
            started: Arc::clone(&started),
            gate: Arc::clone(&gate),
            records: vec![raw("Stale gold", "#gold/1")],
        };
        let cache = Arc::new(ContentCache::new(Box::new(fetcher), Arc::clone(&store)));

        let refreshing = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.refresh().await }
        });

        started.notified().await;
        store.switch().unwrap();
        cache.invalidate();
        gate.notify_one();
        refreshing.await.unwrap();

        let snapshot = cache.snapshot();
        assert!(snapshot.ready);
        assert!(snapshot.articles.is_empty());
    }
}

//! Per-surface query handling with debounced search execution.
//!
//! One [`QueryController`] binds one text input to one result panel. The
//! desktop and mobile headers each own an instance; they share the article
//! cache but nothing else, so their panels open and close independently.
//!
//! Debouncing is a cancel-on-supersede state machine: every input edit aborts
//! the pending timer task (if any) and schedules a fresh one, so within any
//! debounce window only the last edit's search executes. The search body
//! itself is synchronous; aborts can only land while the timer sleeps, never
//! mid-search.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::app::events::QueryEvent;
use crate::app::panel::{PanelState, ResultItem, SurfaceCommand};
use crate::content::ContentCache;
use crate::domain::Article;
use crate::search;

/// Quiet period an edit must survive before its search runs.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Debounce slot; at most one timer task is live per controller.
enum DebounceState {
    Idle,
    Pending(JoinHandle<()>),
}

struct SurfaceState {
    /// Mirror of the host input's current text.
    input: String,

    debounce: DebounceState,

    /// Whether the panel is visibly open on the host.
    panel_open: bool,

    /// Articles behind the currently shown panel, first one is the
    /// navigation target for the acceptance gesture.
    results: Vec<Article>,
}

/// Binds one search surface to the engine.
///
/// Constructed via [`QueryController::new`], which hands back an `Arc`
/// because the debounce task holds a reference across its timer sleep.
/// All event handling is synchronous apart from that timer; commands appear
/// on the sink either immediately or one debounce window after the final
/// edit.
pub struct QueryController {
    cache: Arc<ContentCache>,
    site_base: String,
    sink: UnboundedSender<SurfaceCommand>,
    state: Mutex<SurfaceState>,
}

impl QueryController {
    /// Creates a controller emitting commands into `sink`.
    ///
    /// `site_base` is the absolute prefix detail URLs are built from.
    #[must_use]
    pub fn new(
        cache: Arc<ContentCache>,
        site_base: String,
        sink: UnboundedSender<SurfaceCommand>,
    ) -> Arc<Self> {
        Arc::new(Self {
            cache,
            site_base,
            sink,
            state: Mutex::new(SurfaceState {
                input: String::new(),
                debounce: DebounceState::Idle,
                panel_open: false,
                results: Vec::new(),
            }),
        })
    }

    /// Returns the controller's mirror of the input text.
    #[must_use]
    pub fn current_input(&self) -> String {
        self.state.lock().input.clone()
    }

    /// Feeds one gesture through the controller.
    pub fn handle(self: &Arc<Self>, event: QueryEvent) {
        tracing::debug!(event = ?event, "handling query event");
        match event {
            QueryEvent::InputChanged(text) => self.on_input_changed(text),
            QueryEvent::Focused => self.run_search(""),
            QueryEvent::Cleared => self.on_cleared(),
            QueryEvent::DismissedOutside => self.on_dismissed(),
            QueryEvent::Submitted => self.on_submitted(),
        }
    }

    fn on_input_changed(self: &Arc<Self>, text: String) {
        let mut state = self.state.lock();
        self.emit(SurfaceCommand::SetClearVisible(!text.is_empty()));
        state.input = text;

        if let DebounceState::Pending(handle) =
            std::mem::replace(&mut state.debounce, DebounceState::Idle)
        {
            handle.abort();
        }

        // The query is captured now; later edits schedule their own task.
        let query = state.input.trim().to_string();
        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE_WINDOW).await;
            controller.state.lock().debounce = DebounceState::Idle;
            controller.run_search(&query);
        });
        state.debounce = DebounceState::Pending(handle);
    }

    fn on_cleared(&self) {
        let mut state = self.state.lock();
        state.input.clear();
        if let DebounceState::Pending(handle) =
            std::mem::replace(&mut state.debounce, DebounceState::Idle)
        {
            handle.abort();
        }
        state.panel_open = false;
        state.results.clear();
        drop(state);

        self.emit(SurfaceCommand::SetClearVisible(false));
        self.emit(SurfaceCommand::HidePanel);
    }

    fn on_dismissed(&self) {
        let mut state = self.state.lock();
        state.panel_open = false;
        state.results.clear();
        drop(state);

        // A pending debounce survives dismissal and may reopen the panel.
        self.emit(SurfaceCommand::HidePanel);
    }

    fn on_submitted(&self) {
        let state = self.state.lock();
        let url = match state.results.first() {
            Some(first) if state.panel_open => first.detail_url(&self.site_base),
            _ => {
                tracing::debug!("submit ignored; no visible results");
                return;
            }
        };
        drop(state);

        tracing::debug!(url = %url, "navigating to first result");
        self.emit(SurfaceCommand::Navigate(url));
    }

    /// Resolves a query and pushes the matching panel state.
    ///
    /// The not-ready case renders the loading placeholder instead of
    /// searching; readiness is checked here so neither gesture path has to.
    fn run_search(&self, query: &str) {
        if !self.cache.ready() {
            tracing::debug!("cache not ready; showing loading placeholder");
            let mut state = self.state.lock();
            state.panel_open = true;
            state.results.clear();
            drop(state);

            self.emit(SurfaceCommand::ShowPanel(PanelState::Loading));
            return;
        }

        let snapshot = self.cache.snapshot();
        let results = search::search(query, &snapshot);
        tracing::debug!(query = %query, count = results.len(), "search resolved");

        let mut state = self.state.lock();
        state.panel_open = true;
        if results.is_empty() {
            state.results.clear();
            drop(state);

            self.emit(SurfaceCommand::ShowPanel(PanelState::no_results(query.trim())));
        } else {
            let items = results
                .iter()
                .map(|article| ResultItem::from_article(article, &self.site_base))
                .collect();
            state.results = results;
            drop(state);

            self.emit(SurfaceCommand::ShowPanel(PanelState::results(items)));
        }
    }

    fn emit(&self, command: SurfaceCommand) {
        if self.sink.send(command).is_err() {
            tracing::debug!("surface command dropped; sink closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fetcher::ArticleFetcher;
    use crate::domain::error::Result;
    use crate::domain::RawArticle;
    use crate::storage::{JsonSettings, ModeStore};
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    const SITE_BASE: &str = "https://example.com/trade-gold";

    struct StaticFetcher(Vec<RawArticle>);

    #[async_trait]
    impl ArticleFetcher for StaticFetcher {
        async fn fetch_articles(&self) -> Result<Vec<RawArticle>> {
            Ok(self.0.clone())
        }
    }

    fn raw(id: u64, title: &str, category: &str) -> RawArticle {
        RawArticle {
            id_upper: Some(json!(id)),
            title: Some(json!(title)),
            category: Some(json!(category)),
            link: Some(json!(format!("#gold/{id}"))),
            ..RawArticle::default()
        }
    }

    fn fixture_records() -> Vec<RawArticle> {
        vec![
            raw(10, "Gold rises", "News"),
            raw(11, "Silver falls", "Market"),
            raw(12, "Gold outlook", "News"),
            raw(13, "Oil update", "News"),
        ]
    }

    fn build_cache(records: Vec<RawArticle>, dir: &tempfile::TempDir) -> Arc<ContentCache> {
        let backend = JsonSettings::new(dir.path().join("settings.json")).unwrap();
        let store = ModeStore::new(Box::new(backend));
        store.initialize_default().unwrap();
        Arc::new(ContentCache::new(
            Box::new(StaticFetcher(records)),
            Arc::new(store),
        ))
    }

    async fn ready_controller(
        dir: &tempfile::TempDir,
    ) -> (Arc<QueryController>, UnboundedReceiver<SurfaceCommand>) {
        let cache = build_cache(fixture_records(), dir);
        cache.refresh().await;
        let (tx, rx) = mpsc::unbounded_channel();
        (QueryController::new(cache, SITE_BASE.to_string(), tx), rx)
    }

    /// Lets spawned tasks run without advancing the paused clock.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn shown_titles(command: SurfaceCommand) -> Vec<String> {
        match command {
            SurfaceCommand::ShowPanel(PanelState::Results { items, .. }) => {
                items.into_iter().map(|i| i.title).collect()
            }
            other => panic!("expected a results panel, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_runs_only_the_last_scheduled_search() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, mut rx) = ready_controller(&dir).await;

        controller.handle(QueryEvent::InputChanged("g".to_string()));
        controller.handle(QueryEvent::InputChanged("go".to_string()));
        controller.handle(QueryEvent::InputChanged("gold".to_string()));
        for _ in 0..3 {
            assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::SetClearVisible(true));
        }

        // Let the surviving task register its timer before moving the clock.
        settle().await;
        tokio::time::advance(Duration::from_millis(299)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        let titles = shown_titles(rx.try_recv().unwrap());
        assert_eq!(titles, ["Gold rises", "Gold outlook"]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn an_edit_restarts_the_debounce_window() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, mut rx) = ready_controller(&dir).await;

        controller.handle(QueryEvent::InputChanged("silver".to_string()));
        settle().await;
        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        controller.handle(QueryEvent::InputChanged("gold".to_string()));
        while rx.try_recv().is_ok() {}
        settle().await;

        // The first window's deadline passes without a search.
        tokio::time::advance(Duration::from_millis(150)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(150)).await;
        settle().await;
        assert_eq!(
            shown_titles(rx.try_recv().unwrap()),
            ["Gold rises", "Gold outlook"]
        );
    }

    #[tokio::test]
    async fn focus_when_ready_shows_the_latest_articles_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, mut rx) = ready_controller(&dir).await;

        controller.handle(QueryEvent::Focused);

        let titles = shown_titles(rx.try_recv().unwrap());
        assert_eq!(titles, ["Gold rises", "Silver falls", "Gold outlook"]);
    }

    #[tokio::test]
    async fn focus_before_ready_shows_the_loading_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let cache = build_cache(fixture_records(), &dir);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = QueryController::new(cache, SITE_BASE.to_string(), tx);

        controller.handle(QueryEvent::Focused);

        assert_eq!(
            rx.try_recv().unwrap(),
            SurfaceCommand::ShowPanel(PanelState::Loading)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn a_debounced_search_before_ready_shows_the_loading_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let cache = build_cache(fixture_records(), &dir);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = QueryController::new(cache, SITE_BASE.to_string(), tx);

        controller.handle(QueryEvent::InputChanged("gold".to_string()));
        assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::SetClearVisible(true));

        settle().await;
        tokio::time::advance(DEBOUNCE_WINDOW).await;
        settle().await;
        assert_eq!(
            rx.try_recv().unwrap(),
            SurfaceCommand::ShowPanel(PanelState::Loading)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn clear_resets_input_and_cancels_the_pending_search() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, mut rx) = ready_controller(&dir).await;

        controller.handle(QueryEvent::InputChanged("gold".to_string()));
        controller.handle(QueryEvent::Cleared);

        assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::SetClearVisible(true));
        assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::SetClearVisible(false));
        assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::HidePanel);
        assert_eq!(controller.current_input(), "");

        tokio::time::advance(Duration::from_millis(400)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissal_hides_the_panel_but_keeps_the_input() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, mut rx) = ready_controller(&dir).await;

        controller.handle(QueryEvent::InputChanged("gold".to_string()));
        controller.handle(QueryEvent::DismissedOutside);

        assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::SetClearVisible(true));
        assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::HidePanel);
        assert_eq!(controller.current_input(), "gold");

        // The pending search still fires and reopens the panel.
        settle().await;
        tokio::time::advance(DEBOUNCE_WINDOW).await;
        settle().await;
        assert_eq!(
            shown_titles(rx.try_recv().unwrap()),
            ["Gold rises", "Gold outlook"]
        );
    }

    #[tokio::test]
    async fn submit_navigates_to_the_first_visible_result() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, mut rx) = ready_controller(&dir).await;

        controller.handle(QueryEvent::Focused);
        rx.try_recv().unwrap();

        controller.handle(QueryEvent::Submitted);
        assert_eq!(
            rx.try_recv().unwrap(),
            SurfaceCommand::Navigate(format!("{SITE_BASE}/detail?id=10"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn submit_is_a_no_op_without_visible_results() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, mut rx) = ready_controller(&dir).await;

        controller.handle(QueryEvent::Submitted);
        assert!(rx.try_recv().is_err());

        // A no-results panel has nothing to navigate to either.
        controller.handle(QueryEvent::InputChanged("zzz".to_string()));
        settle().await;
        tokio::time::advance(DEBOUNCE_WINDOW).await;
        settle().await;
        while rx.try_recv().is_ok() {}
        controller.handle(QueryEvent::Submitted);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn unmatched_queries_render_a_named_no_results_panel() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, mut rx) = ready_controller(&dir).await;

        controller.handle(QueryEvent::InputChanged("zzz".to_string()));
        assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::SetClearVisible(true));

        settle().await;
        tokio::time::advance(DEBOUNCE_WINDOW).await;
        settle().await;
        assert_eq!(
            rx.try_recv().unwrap(),
            SurfaceCommand::ShowPanel(PanelState::NoResults {
                message: "No articles match \"zzz\"".to_string()
            })
        );
    }
}

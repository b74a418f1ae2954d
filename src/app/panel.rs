//! Result-panel view models and surface commands.
//!
//! This module defines the immutable view models a search surface renders,
//! plus the command stream a [`QueryController`] emits toward its host. View
//! models carry display-ready data only: URLs are already built, image
//! references already rewritten, and placeholder text already substituted, so
//! a renderer never touches domain types.
//!
//! [`QueryController`]: crate::app::QueryController

use crate::domain::{display_image_url, Article};

/// Header text shown above every result list.
pub const RESULTS_HEADER: &str = "Latest articles";

/// Panel text a host renders for [`PanelState::Loading`].
pub const LOADING_MESSAGE: &str = "Loading articles...";

/// Message shown when the cache is ready but holds nothing at all.
pub const EMPTY_MESSAGE: &str = "No articles yet";

/// Display information for a single result row.
///
/// Represents one entry in the dropdown. All fields are pre-computed from the
/// underlying article and the configured site base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    /// Headline text.
    pub title: String,

    /// Category label, never empty (a placeholder substitutes for blanks).
    pub category: String,

    /// Display date, may be empty.
    pub date: String,

    /// Absolute detail-page URL.
    pub url: String,

    /// Direct-serving image URL, when the article carries an image.
    pub image_url: Option<String>,
}

impl ResultItem {
    /// Builds a display row from an article.
    #[must_use]
    pub fn from_article(article: &Article, site_base: &str) -> Self {
        Self {
            title: article.title.clone(),
            category: article.display_category().to_string(),
            date: article.date.clone(),
            url: article.detail_url(site_base),
            image_url: article.image.as_deref().map(display_image_url),
        }
    }
}

/// Renderable state of one result panel.
///
/// Every search outcome maps to one of these; no error state exists because
/// failures degrade to informational panels upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    /// The cache has not completed its first refresh yet.
    Loading,

    /// One or more results to display under [`RESULTS_HEADER`].
    Results {
        /// Header text for the list.
        header: String,
        /// Rows in cache order.
        items: Vec<ResultItem>,
    },

    /// The search ran and nothing qualified.
    NoResults {
        /// Explanatory message, query-specific when a query was given.
        message: String,
    },
}

impl PanelState {
    /// Builds the populated-results state.
    #[must_use]
    pub fn results(items: Vec<ResultItem>) -> Self {
        PanelState::Results {
            header: RESULTS_HEADER.to_string(),
            items,
        }
    }

    /// Builds the no-results state for the given query.
    ///
    /// An empty query produces the generic empty-cache message; anything else
    /// names the query that failed to match.
    #[must_use]
    pub fn no_results(query: &str) -> Self {
        let message = if query.is_empty() {
            EMPTY_MESSAGE.to_string()
        } else {
            format!("No articles match \"{query}\"")
        };
        PanelState::NoResults { message }
    }
}

/// Commands a controller emits toward its host surface.
///
/// The host owns the actual input element and panel markup; the controller
/// tells it what to show. Commands are self-contained so the host needs no
/// access to engine state to execute them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// Replace the panel contents and make it visible.
    ShowPanel(PanelState),

    /// Hide the panel and discard its contents.
    HidePanel,

    /// Show or hide the input's clear affordance.
    SetClearVisible(bool),

    /// Open the given URL; emitted when a result is activated.
    Navigate(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Article, RawArticle};
    use serde_json::json;

    #[test]
    fn result_items_are_display_ready() {
        let raw = RawArticle {
            title: Some(json!("Gold rises")),
            id_upper: Some(json!(42)),
            image: Some(json!("https://drive.google.com/file/d/abc/view")),
            ..RawArticle::default()
        };
        let article = Article::from_raw(&raw).unwrap();

        let item = ResultItem::from_article(&article, "https://example.com/trade-gold");
        assert_eq!(item.url, "https://example.com/trade-gold/detail?id=42");
        assert_eq!(item.category, "General");
        assert_eq!(
            item.image_url.as_deref(),
            Some("https://lh3.googleusercontent.com/d/abc")
        );
    }

    #[test]
    fn no_results_messages_name_the_query() {
        assert_eq!(
            PanelState::no_results("zzz"),
            PanelState::NoResults {
                message: "No articles match \"zzz\"".to_string()
            }
        );
        assert_eq!(
            PanelState::no_results(""),
            PanelState::NoResults {
                message: EMPTY_MESSAGE.to_string()
            }
        );
    }
}

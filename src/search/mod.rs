//! Pure search over cache snapshots.
//!
//! The search surface is a dropdown, not a results page: an empty query shows
//! the newest few articles as a teaser, and a non-empty query returns every
//! match so the dropdown can scroll. Matching is plain case-insensitive
//! substring containment over the three text fields, with no ranking and no
//! fuzzy tolerance. Everything here is a pure function of its arguments,
//! which keeps the debounce and panel logic trivially testable.

use crate::content::CacheSnapshot;
use crate::domain::Article;

/// Number of articles the empty-query surface shows.
pub const RECENT_LIMIT: usize = 3;

/// Resolves a query against a cache snapshot.
///
/// An empty or whitespace-only query returns the first [`RECENT_LIMIT`]
/// articles in cache order. Any other query returns every article whose
/// title, excerpt or category contains the lower-cased query as a substring,
/// preserving cache order and without truncation.
///
/// Readiness is the caller's precondition: a controller never calls this
/// before the cache reports ready, and the function itself does not consult
/// the flag.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tradesite::content::CacheSnapshot;
/// use tradesite::search::search;
///
/// let snapshot = CacheSnapshot { articles: Arc::new(Vec::new()), ready: true };
/// assert!(search("gold", &snapshot).is_empty());
/// ```
#[must_use]
pub fn search(query: &str, snapshot: &CacheSnapshot) -> Vec<Article> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return snapshot.articles.iter().take(RECENT_LIMIT).cloned().collect();
    }

    let needle = trimmed.to_lowercase();
    snapshot
        .articles
        .iter()
        .filter(|article| matches_query(article, &needle))
        .cloned()
        .collect()
}

/// Returns whether any searchable field contains the lower-cased needle.
fn matches_query(article: &Article, needle: &str) -> bool {
    article.title.to_lowercase().contains(needle)
        || article.excerpt.to_lowercase().contains(needle)
        || article.category.to_lowercase().contains(needle)
}

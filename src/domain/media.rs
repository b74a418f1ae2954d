//! Image reference rewriting for display.
//!
//! Upstream rows frequently paste Google Drive sharing links into the image
//! column. Those links point at an interstitial viewer page rather than image
//! bytes, so they are rewritten to the direct-content host before a renderer
//! ever sees them. Anything that is not a Drive link passes through verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the file id in path-style sharing links (`.../d/<id>/view`).
static DRIVE_PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/d/([^/]+)/").expect("valid pattern"));

/// Matches the file id in query-style sharing links (`...?id=<id>&...`).
static DRIVE_QUERY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"id=([^&]+)").expect("valid pattern"));

/// Host serving raw Drive file content.
const DRIVE_CONTENT_HOST: &str = "https://lh3.googleusercontent.com/d/";

/// Rewrites a Drive sharing link to its direct-content form.
///
/// Both sharing shapes are recognized, path style first. When the reference
/// is not a Drive link, or no file id can be extracted from it, the original
/// string is returned unchanged.
///
/// # Examples
///
/// ```
/// use tradesite::domain::display_image_url;
///
/// assert_eq!(
///     display_image_url("https://drive.google.com/file/d/abc123/view"),
///     "https://lh3.googleusercontent.com/d/abc123"
/// );
/// assert_eq!(
///     display_image_url("https://example.com/photo.jpg"),
///     "https://example.com/photo.jpg"
/// );
/// ```
#[must_use]
pub fn display_image_url(image: &str) -> String {
    if !image.contains("drive.google.com") {
        return image.to_string();
    }

    let file_id = DRIVE_PATH_RE
        .captures(image)
        .and_then(|c| c.get(1))
        .or_else(|| DRIVE_QUERY_RE.captures(image).and_then(|c| c.get(1)))
        .map(|m| m.as_str());

    match file_id {
        Some(id) => format!("{DRIVE_CONTENT_HOST}{id}"),
        None => image.to_string(),
    }
}

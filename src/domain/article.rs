//! Article domain model and payload normalization.
//!
//! This module defines the core `Article` type served to the search and panel
//! layers, plus the `RawArticle` shape that mirrors the upstream sheet export.
//! The export is loosely typed: the same logical field arrives under several
//! alternate keys, values may be strings or numbers, and blank cells appear as
//! empty strings. Normalization resolves every alias chain with
//! first-present-wins semantics before any other layer sees the record.

use serde::Deserialize;
use serde_json::Value;

use super::SiteMode;

/// Category shown when an article carries none.
///
/// Search still matches against the raw (possibly empty) category; the
/// placeholder exists purely for display.
pub const DEFAULT_CATEGORY: &str = "General";

/// Identifier used when a record carries no id-like field at all.
const DEFAULT_ARTICLE_ID: &str = "1";

/// One record exactly as the upstream index delivers it.
///
/// Every field is optional and untyped because the sheet export fills columns
/// inconsistently: an id may be the number `7` in one row and the string
/// `"7"` in the next, and older rows use the question/answer column names
/// instead of title/excerpt. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(rename = "Title")]
    pub title: Option<Value>,
    #[serde(rename = "Question")]
    pub question: Option<Value>,
    #[serde(rename = "Excerpt")]
    pub excerpt: Option<Value>,
    #[serde(rename = "Answer")]
    pub answer: Option<Value>,
    #[serde(rename = "Category")]
    pub category: Option<Value>,
    #[serde(rename = "หมวดหมู่")]
    pub category_th: Option<Value>,
    #[serde(rename = "Date")]
    pub date: Option<Value>,
    #[serde(rename = "ID")]
    pub id_upper: Option<Value>,
    #[serde(rename = "id")]
    pub id_lower: Option<Value>,
    #[serde(rename = "No")]
    pub no_upper: Option<Value>,
    #[serde(rename = "no")]
    pub no_lower: Option<Value>,
    #[serde(rename = "Image")]
    pub image: Option<Value>,
    #[serde(rename = "Link")]
    pub link: Option<Value>,
}

/// A normalized article ready for searching and presentation.
///
/// Produced by [`Article::from_raw`]; records without any usable title are
/// rejected there, so `title` is always non-empty. The remaining string
/// fields may be empty when the upstream row left them blank.
///
/// # Fields
///
/// - `id`: Identifier used to build the detail URL, `"1"` when absent
/// - `title`: Headline text, first of the title/question columns
/// - `excerpt`: Summary text, first of the excerpt/answer columns
/// - `category`: Category text, first of the English/Thai category columns
/// - `date`: Display date string, passed through verbatim
/// - `image`: Optional image reference, rewritten for display by the media helpers
/// - `link`: Mode-tagged link; its prefix assigns the article to gold or silver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub date: String,
    pub image: Option<String>,
    pub link: String,
}

impl Article {
    /// Normalizes a raw record, or returns `None` when it has no usable title.
    ///
    /// Each logical field walks its alias chain and takes the first value that
    /// is present under the upstream's loose rules: non-empty strings and
    /// non-zero numbers count, everything else is absent. A record whose title
    /// and question are both absent is dropped entirely; such rows are
    /// separators or half-filled drafts in the sheet.
    #[must_use]
    pub fn from_raw(raw: &RawArticle) -> Option<Self> {
        let title = first_present([&raw.title, &raw.question])?;
        let excerpt = first_present([&raw.excerpt, &raw.answer]).unwrap_or_default();
        let category = first_present([&raw.category, &raw.category_th]).unwrap_or_default();
        let date = first_present([&raw.date]).unwrap_or_default();
        let id = first_present([&raw.id_upper, &raw.id_lower, &raw.no_upper, &raw.no_lower])
            .unwrap_or_else(|| DEFAULT_ARTICLE_ID.to_string());
        let image = first_present([&raw.image]);
        let link = first_present([&raw.link]).unwrap_or_default();

        Some(Self {
            id,
            title,
            excerpt,
            category,
            date,
            image,
            link,
        })
    }

    /// Returns whether this article belongs to the given display mode.
    ///
    /// Membership is decided by the link prefix, compared case-insensitively,
    /// so `#Gold`, `#gold` and `#GOLD` all land in the gold mode. Articles
    /// with an empty or unprefixed link belong to no mode.
    #[must_use]
    pub fn belongs_to(&self, mode: SiteMode) -> bool {
        self.link.to_lowercase().starts_with(mode.link_prefix())
    }

    /// Builds the detail-page URL for this article.
    ///
    /// # Examples
    ///
    /// ```
    /// use tradesite::domain::{Article, RawArticle};
    /// use serde_json::json;
    ///
    /// let raw = RawArticle {
    ///     title: Some(json!("Gold rises")),
    ///     id_upper: Some(json!(42)),
    ///     ..RawArticle::default()
    /// };
    /// let article = Article::from_raw(&raw).unwrap();
    /// assert_eq!(
    ///     article.detail_url("https://example.com/trade-gold"),
    ///     "https://example.com/trade-gold/detail?id=42"
    /// );
    /// ```
    #[must_use]
    pub fn detail_url(&self, site_base: &str) -> String {
        format!("{}/detail?id={}", site_base.trim_end_matches('/'), self.id)
    }

    /// Returns the category for display, substituting the placeholder when empty.
    #[must_use]
    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            &self.category
        }
    }
}

/// Walks an alias chain and returns the first present value, coerced to text.
fn first_present<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a Option<Value>>,
{
    candidates.into_iter().flatten().find_map(coerce)
}

/// Applies the upstream's loose presence rules to a single field value.
///
/// Non-empty strings count as present; numbers count unless they are zero
/// (blank numeric cells export as `0`); null, booleans and nested structures
/// are treated as absent so the next alias in the chain gets a chance.
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i != 0).then(|| i.to_string())
            } else if let Some(u) = n.as_u64() {
                (u != 0).then(|| u.to_string())
            } else {
                n.as_f64().filter(|f| *f != 0.0).map(|f| f.to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_with_title(title: &str) -> RawArticle {
        RawArticle {
            title: Some(json!(title)),
            ..RawArticle::default()
        }
    }

    #[test]
    fn question_and_answer_columns_back_fill_title_and_excerpt() {
        let raw = RawArticle {
            question: Some(json!("Why did silver fall?")),
            answer: Some(json!("Industrial demand slowed.")),
            ..RawArticle::default()
        };

        let article = Article::from_raw(&raw).unwrap();
        assert_eq!(article.title, "Why did silver fall?");
        assert_eq!(article.excerpt, "Industrial demand slowed.");
    }

    #[test]
    fn title_column_wins_over_question() {
        let raw = RawArticle {
            title: Some(json!("Gold rises")),
            question: Some(json!("ignored")),
            ..RawArticle::default()
        };

        assert_eq!(Article::from_raw(&raw).unwrap().title, "Gold rises");
    }

    #[test]
    fn records_without_any_title_are_dropped() {
        assert!(Article::from_raw(&RawArticle::default()).is_none());

        let blank = RawArticle {
            title: Some(json!("")),
            question: Some(json!(0)),
            ..RawArticle::default()
        };
        assert!(Article::from_raw(&blank).is_none());
    }

    #[test]
    fn empty_strings_fall_through_to_the_next_alias() {
        let raw = RawArticle {
            title: Some(json!("")),
            question: Some(json!("From the question column")),
            category: Some(json!("")),
            category_th: Some(json!("ข่าว")),
            ..RawArticle::default()
        };

        let article = Article::from_raw(&raw).unwrap();
        assert_eq!(article.title, "From the question column");
        assert_eq!(article.category, "ข่าว");
    }

    #[test]
    fn id_chain_prefers_uppercase_and_accepts_numbers() {
        let raw = RawArticle {
            id_upper: Some(json!(7)),
            id_lower: Some(json!("ignored")),
            ..raw_with_title("t")
        };
        assert_eq!(Article::from_raw(&raw).unwrap().id, "7");

        let raw = RawArticle {
            no_lower: Some(json!("15")),
            ..raw_with_title("t")
        };
        assert_eq!(Article::from_raw(&raw).unwrap().id, "15");
    }

    #[test]
    fn zero_ids_are_treated_as_absent() {
        let raw = RawArticle {
            id_upper: Some(json!(0)),
            ..raw_with_title("t")
        };
        assert_eq!(Article::from_raw(&raw).unwrap().id, "1");
    }

    #[test]
    fn missing_id_defaults_to_one() {
        let article = Article::from_raw(&raw_with_title("t")).unwrap();
        assert_eq!(article.id, "1");
        assert_eq!(article.detail_url("https://example.com/trade-gold/"), "https://example.com/trade-gold/detail?id=1");
    }

    #[test]
    fn mode_membership_is_case_insensitive_on_the_link() {
        let mut article = Article::from_raw(&raw_with_title("t")).unwrap();

        article.link = "#Gold-news/today".to_string();
        assert!(article.belongs_to(SiteMode::Gold));
        assert!(!article.belongs_to(SiteMode::Silver));

        article.link = "#SILVER".to_string();
        assert!(article.belongs_to(SiteMode::Silver));

        article.link = String::new();
        assert!(!article.belongs_to(SiteMode::Gold));
        assert!(!article.belongs_to(SiteMode::Silver));
    }

    #[test]
    fn display_category_substitutes_the_placeholder() {
        let article = Article::from_raw(&raw_with_title("t")).unwrap();
        assert_eq!(article.display_category(), DEFAULT_CATEGORY);

        let raw = RawArticle {
            category: Some(json!("Market")),
            ..raw_with_title("t")
        };
        assert_eq!(Article::from_raw(&raw).unwrap().display_category(), "Market");
    }
}

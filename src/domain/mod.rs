//! Domain layer for the TradeSite engine.
//!
//! This module contains the core domain types and business rules of the
//! engine, independent of HTTP, storage or presentation concerns. It follows
//! domain-driven design principles by keeping business rules isolated from
//! external dependencies.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`article`]: Article model and upstream payload normalization
//! - [`media`]: Image reference rewriting for display
//! - [`mode`]: The gold/silver display-mode type
//!
//! # Examples
//!
//! ```
//! use tradesite::domain::{Article, RawArticle, SiteMode};
//! use serde_json::json;
//!
//! let raw = RawArticle {
//!     title: Some(json!("Gold rises")),
//!     link: Some(json!("#gold-news/today")),
//!     ..RawArticle::default()
//! };
//! let article = Article::from_raw(&raw).unwrap();
//! assert!(article.belongs_to(SiteMode::Gold));
//! ```

pub mod article;
pub mod error;
pub mod media;
pub mod mode;

pub use article::{Article, RawArticle, DEFAULT_CATEGORY};
pub use error::{Result, TradesiteError};
pub use media::display_image_url;
pub use mode::SiteMode;

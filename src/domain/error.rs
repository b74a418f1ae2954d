//! Error types for the TradeSite engine.
//!
//! This module defines the centralized error type [`TradesiteError`] and a type alias
//! [`Result`] for convenient error handling throughout the engine. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for TradeSite engine operations.
///
/// This enum consolidates all error conditions that can occur while the engine runs,
/// from settings persistence to upstream fetches and configuration issues. Only the
/// I/O variant converts automatically with `#[from]`; the remaining variants carry a
/// description assembled at the failure site.
///
/// # Examples
///
/// ```
/// use tradesite::domain::TradesiteError;
///
/// // Explicit error construction
/// fn validate_config() -> Result<(), TradesiteError> {
///     Err(TradesiteError::Config("Missing required field".to_string()))
/// }
///
/// fn read_settings() -> Result<(), TradesiteError> {
///     Err(TradesiteError::Storage("Failed to read file".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum TradesiteError {
    /// Settings persistence failed.
    ///
    /// Occurs when reading from or writing to the settings backend fails.
    /// The string contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Upstream article fetch failed.
    ///
    /// Occurs when the HTTP request for the article index cannot be sent, returns
    /// a failure status, or delivers a body that is not JSON. The string contains
    /// details about the failed exchange.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values are missing or malformed.
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for TradeSite operations.
///
/// This is a type alias for `std::result::Result<T, TradesiteError>` that simplifies
/// function signatures throughout the codebase.
///
/// # Examples
///
/// ```
/// use tradesite::domain::Result;
///
/// fn reload_articles() -> Result<()> {
///     // Function that may return TradesiteError
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, TradesiteError>;

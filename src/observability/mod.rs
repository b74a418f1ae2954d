//! Tracing setup for the engine.
//!
//! This module wires the `tracing` macros used throughout the crate to a
//! formatted subscriber writing to stderr, keeping stdout free for the
//! surface output of the console harness.
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option in the configuration file
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! Initialize tracing early, before the engine starts:
//!
//! ```rust
//! use tradesite::observability::init_tracing;
//! use tradesite::Config;
//!
//! let config = Config::default();
//! init_tracing(&config);
//!
//! tracing::debug!("engine initialized");
//! ```

mod init;

pub use init::init_tracing;

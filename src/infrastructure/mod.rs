//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module resolves where persisted state and configuration live on the
//! host filesystem, including `~` expansion for paths read from the
//! configuration file.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, DATA_DIR_ENV};

//! Storage layer for persisted site settings.
//!
//! This module provides the settings abstraction the engine persists through,
//! most importantly the display mode. It uses JSON file storage with atomic
//! writes, fronted by a guarded handle that protects the mode key from
//! unauthorized mutation.
//!
//! # Modules
//!
//! - `backend`: Settings trait abstraction for backend implementations
//! - `json`: JSON file-based settings implementation
//! - `mode_store`: Guarded mode persistence and change notification

pub mod backend;
pub mod json;
pub mod mode_store;

pub use backend::SettingsStore;
pub use json::JsonSettings;
pub use mode_store::{GuardedSettings, ModeStore, MODE_KEY};

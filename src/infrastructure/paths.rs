//! Filesystem locations for persisted engine state.
//!
//! This module resolves where the engine keeps its settings file. The
//! location can be overridden through the environment or the configuration
//! file; paths from the latter may use `~` shorthand, expanded here.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TRADESITE_DATA_DIR";

/// Returns the directory persisted engine state lives in.
///
/// Resolution order: the [`DATA_DIR_ENV`] environment variable, then
/// `~/.local/share/tradesite`, then `.tradesite` relative to the working
/// directory when no home directory can be determined. The settings file
/// `settings.json` is located within this directory.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".local/share").join("tradesite"),
        None => PathBuf::from(".tradesite"),
    }
}

/// Expands a leading tilde to the user's home directory.
///
/// Configuration values may use `~` shorthand for home-relative paths. When
/// `HOME` is unset the path is returned unchanged.
///
/// # Examples
///
/// ```no_run
/// use tradesite::infrastructure::expand_tilde;
///
/// let expanded = expand_tilde("~/sites/tradesite.toml");
/// assert!(!expanded.starts_with('~') || std::env::var_os("HOME").is_none());
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = std::env::var_os("HOME") else {
        return path.to_string();
    };
    let home = home.to_string_lossy();

    if let Some(rest) = path.strip_prefix("~/") {
        format!("{home}/{rest}")
    } else if path == "~" {
        home.into_owned()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_and_relative_paths_pass_through() {
        assert_eq!(expand_tilde("/etc/tradesite.toml"), "/etc/tradesite.toml");
        assert_eq!(expand_tilde("configs/site.toml"), "configs/site.toml");
        assert_eq!(expand_tilde("~weird"), "~weird");
    }

    #[test]
    fn tilde_prefixes_expand_to_home() {
        if let Some(home) = std::env::var_os("HOME") {
            let home = home.to_string_lossy().into_owned();
            assert_eq!(expand_tilde("~/site.toml"), format!("{home}/site.toml"));
            assert_eq!(expand_tilde("~"), home);
        }
    }

    #[test]
    fn data_dir_points_at_the_app_directory() {
        if std::env::var_os(DATA_DIR_ENV).is_none() && std::env::var_os("HOME").is_some() {
            assert!(get_data_dir().ends_with("tradesite"));
        }
    }
}

//! XDG Base Directory paths for camctl.
//!
//! CLI tools should use XDG paths for cross-platform consistency,
//! not platform-native paths.

use std::path::{Path, PathBuf};

/// Name of the configuration file in both the user and project directories
pub const CONFIG_FILE: &str = "config.toml";

/// Directory holding project configuration, relative to the working directory
pub const PROJECT_CONFIG_DIR: &str = ".camctl";

/// Environment variable overriding the project configuration directory
pub const PROJECT_CONFIG_DIR_ENV: &str = "CAMCTL_PROJECT_CONFIG_DIR";

/// Get the camctl config directory.
///
/// Returns `$XDG_CONFIG_HOME/camctl` if set, otherwise `~/.config/camctl`.
///
/// # Examples
///
/// ```
/// use camctl_paths::config_dir;
///
/// let config = config_dir();
/// let file = config.join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("camctl")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/camctl")
    } else {
        PathBuf::from(".config/camctl")
    }
}

/// Path of the user configuration file.
pub fn user_config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Directory holding project configuration.
///
/// `$CAMCTL_PROJECT_CONFIG_DIR` if set, otherwise `.camctl` under `base`.
pub fn project_config_dir(base: &Path) -> PathBuf {
    match std::env::var(PROJECT_CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => base.join(PROJECT_CONFIG_DIR),
    }
}

/// Path of the project configuration file under `base`.
pub fn project_config_file(base: &Path) -> PathBuf {
    project_config_dir(base).join(CONFIG_FILE)
}

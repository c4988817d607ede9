// ABOUTME: Shared constants for the remote table schema and local paths
// ABOUTME: Field names every table carries and the default config location

use std::path::PathBuf;

/// Integer primary key assigned by the remote store
pub const ID_FIELD: &str = "Id";

/// Display name column present on every table
pub const NAME_FIELD: &str = "Name";

/// Get the Taskdeck configuration directory (e.g. ~/.config/taskdeck)
pub fn taskdeck_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskdeck")
}

/// Get the path to the default config file (~/.config/taskdeck/config.toml)
pub fn default_config_file() -> PathBuf {
    taskdeck_dir().join("config.toml")
}

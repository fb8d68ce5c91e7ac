use std::path::PathBuf;
use std::sync::OnceLock;

// Cache the paths to avoid repeated environment lookups
static CALFINDER_HOME: OnceLock<PathBuf> = OnceLock::new();
static CALFINDER_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the calfinder home directory
/// Checks CALFINDER_HOME environment variable, falls back to ${HOME}/.calfinder
pub fn calfinder_home() -> PathBuf {
    CALFINDER_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("CALFINDER_HOME") {
                PathBuf::from(path)
            } else {
                let home = std::env::var("HOME").unwrap_or_else(|_| {
                    std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string())
                });
                PathBuf::from(home).join(".calfinder")
            }
        })
        .clone()
}

/// Directory holding the bundled profiles and the N-ter reference database
/// Checks CALFINDER_DATA_DIR environment variable, falls back to CALFINDER_HOME/data
pub fn calfinder_data_dir() -> PathBuf {
    CALFINDER_DATA_DIR
        .get_or_init(|| {
            if let Ok(path) = std::env::var("CALFINDER_DATA_DIR") {
                PathBuf::from(path)
            } else {
                calfinder_home().join("data")
            }
        })
        .clone()
}

/// Check if using a custom data directory
pub fn is_custom_data_dir() -> bool {
    std::env::var("CALFINDER_DATA_DIR").is_ok()
}

/// Human readable summary of resolved locations
pub fn describe_paths() -> String {
    format!(
        "calfinder paths:\n  home: {}\n  data: {}{}",
        calfinder_home().display(),
        calfinder_data_dir().display(),
        if is_custom_data_dir() { " (custom)" } else { "" }
    )
}

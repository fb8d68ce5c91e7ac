//! Core utilities and types shared across all calfinder crates

pub mod config;
pub mod error;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, save_config, Config};
pub use error::{CalfError, CalfResult};
pub use types::{is_known_nter, FeatureClass, KNOWN_NTER_TYPES};

// Re-export system utilities
pub use system::{calfinder_data_dir, calfinder_home};

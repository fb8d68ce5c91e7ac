pub mod paths;

// Re-export commonly used functions
pub use paths::{calfinder_data_dir, calfinder_home, describe_paths, is_custom_data_dir};

//! External tool integration for calfinder
//!
//! Capability traits for profile search and local alignment, the
//! `hmmsearch` and `blastp` backends behind them, and tool discovery.

// Modules
pub mod aligners;
pub mod manager;
pub mod runner;
pub mod searchers;
pub mod testing;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use aligners::BlastpAligner;
pub use manager::{ToolInfo, ToolManager};
pub use searchers::HmmsearchRunner;
pub use testing::{MockAligner, MockSearcher};
pub use traits::{Aligner, ProfileSearcher, SearchOptions};
pub use types::Tool;

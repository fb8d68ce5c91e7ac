//! calfinder command line front-end
//!
//! The binary lives in `main.rs`; the pipeline and report writers are
//! exposed here so they can be driven with scripted collaborators.

pub mod cli;
pub mod pipeline;
pub mod report;

pub use pipeline::{Pipeline, RunSummary};
pub use report::OutputLayout;

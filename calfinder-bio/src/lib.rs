//! Sequences, file formats and the annotation core for calfinder

pub mod annotation;
pub mod formats;
pub mod sequence;

// Re-export commonly used types
pub use annotation::{Flag, Hit};
pub use formats::{parse_fasta, read_fasta_input, write_fasta};
pub use sequence::Sequence;

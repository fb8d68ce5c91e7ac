pub mod blastp;

pub use blastp::{parse_blast_tab, BlastpAligner};

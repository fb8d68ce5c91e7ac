pub mod fasta;
pub mod hmm;

// Re-export commonly used functions
pub use fasta::{parse_fasta, read_fasta_input, write_fasta, write_fasta_to_writer};
pub use hmm::{read_profile_header, ProfileHeader};

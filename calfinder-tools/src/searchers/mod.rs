pub mod hmmsearch;

pub use hmmsearch::{parse_domtblout, HmmsearchRunner};

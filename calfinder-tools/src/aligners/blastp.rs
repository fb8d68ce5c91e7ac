//! BLAST+ `blastp` backend

use crate::runner::{query_version, run_checked, spinner};
use crate::traits::{Aligner, TabularHit};
use crate::types::Tool;
use anyhow::Result;
use calfinder_core::CalfError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Columns requested from blastp, in output order
pub const OUTFMT: &str = "6 qacc sacc qlen slen evalue bitscore pident qstart qend sstart send";

/// Runs `blastp -query .. -subject ..` and parses its tabular stdout
pub struct BlastpAligner {
    binary_path: PathBuf,
}

impl BlastpAligner {
    pub fn new(binary_path: PathBuf) -> Result<Self> {
        if !binary_path.exists() {
            anyhow::bail!("blastp binary not found at {:?}", binary_path);
        }
        Ok(Self { binary_path })
    }
}

impl Aligner for BlastpAligner {
    fn align(&mut self, query: &Path, subject: &Path, evalue: f64) -> Result<Vec<TabularHit>> {
        // -num_threads is rejected together with -subject, so none is passed
        let mut cmd = Command::new(&self.binary_path);
        cmd.arg("-query")
            .arg(query)
            .arg("-subject")
            .arg(subject)
            .arg("-evalue")
            .arg(evalue.to_string())
            .arg("-outfmt")
            .arg(OUTFMT);

        let pb = spinner("blastp against N-ter references".to_string());
        let result = run_checked(Tool::Blastp, &mut cmd);
        pb.finish_and_clear();
        let output = result?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let hits = parse_blast_tab(&stdout).map_err(CalfError::Parse)?;
        tracing::debug!("blastp reported {} alignment(s)", hits.len());
        Ok(hits)
    }

    fn version(&self) -> Result<String> {
        query_version(Tool::Blastp, &self.binary_path)
    }

    fn is_available(&self) -> bool {
        self.binary_path.exists()
    }
}

/// Parse tabular output written with [`OUTFMT`]
pub fn parse_blast_tab(text: &str) -> Result<Vec<TabularHit>, String> {
    let mut hits = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split('\t').map(str::trim).collect();
        if parts.len() < 11 {
            return Err(format!(
                "line {}: expected 11 tab-separated columns, found {}",
                lineno + 1,
                parts.len()
            ));
        }

        let bad = |col: usize| format!("line {}: bad value '{}' in column {}", lineno + 1, parts[col], col + 1);
        let int = |col: usize| parts[col].parse::<usize>().map_err(|_| bad(col));
        let float = |col: usize| parts[col].parse::<f64>().map_err(|_| bad(col));

        hits.push(TabularHit {
            query_id: parts[0].to_string(),
            subject_id: parts[1].to_string(),
            query_length: int(2)?,
            subject_length: int(3)?,
            evalue: float(4)?,
            bit_score: float(5)?,
            identity: float(6)?,
            query_start: int(7)?,
            query_end: int(8)?,
            subject_start: int(9)?,
            subject_end: int(10)?,
        });
    }

    Ok(hits)
}

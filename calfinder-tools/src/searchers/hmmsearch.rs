//! HMMER `hmmsearch` backend

use crate::runner::{query_version, run_checked, spinner};
use crate::traits::{DomainAlignment, ProfileHits, ProfileSearcher, SearchOptions, TargetHit};
use crate::types::Tool;
use anyhow::{Context, Result};
use calfinder_bio::formats::fasta::write_fasta;
use calfinder_bio::formats::hmm::read_profile_header;
use calfinder_bio::sequence::Sequence;
use calfinder_core::CalfError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs `hmmsearch` once per profile and reads its `--domtblout` table
pub struct HmmsearchRunner {
    binary_path: PathBuf,
}

impl HmmsearchRunner {
    pub fn new(binary_path: PathBuf) -> Result<Self> {
        if !binary_path.exists() {
            anyhow::bail!("hmmsearch binary not found at {:?}", binary_path);
        }
        Ok(Self { binary_path })
    }

    fn search_profile(
        &self,
        fasta: &Path,
        profile: &Path,
        work_dir: &Path,
        options: &SearchOptions,
    ) -> Result<ProfileHits> {
        let header = read_profile_header(profile)?;
        let table = work_dir.join(format!("{}.domtbl", header.name));
        let log = work_dir.join(format!("{}.out", header.name));

        let threads = if options.threads == 0 {
            num_cpus::get()
        } else {
            options.threads
        };

        let mut cmd = Command::new(&self.binary_path);
        cmd.arg("--cpu")
            .arg(threads.to_string())
            .arg("--domZ")
            .arg(options.dom_z.to_string())
            .arg("--noali")
            .arg("-o")
            .arg(&log)
            .arg("--domtblout")
            .arg(&table)
            .arg(profile)
            .arg(fasta);

        let pb = spinner(format!("hmmsearch {}", header.name));
        let result = run_checked(Tool::Hmmsearch, &mut cmd);
        pb.finish_and_clear();
        result?;

        let text = std::fs::read_to_string(&table)
            .with_context(|| format!("hmmsearch wrote no table at {}", table.display()))?;
        let hits = parse_domtblout(&text)
            .map_err(|e| CalfError::Parse(format!("{}: {}", table.display(), e)))?;

        tracing::debug!("{}: {} target(s) hit", header.name, hits.len());
        Ok(ProfileHits {
            profile: header.name,
            profile_length: header.length,
            hits,
        })
    }
}

impl ProfileSearcher for HmmsearchRunner {
    fn search(
        &mut self,
        sequences: &[Sequence],
        profiles: &[PathBuf],
        options: &SearchOptions,
    ) -> Result<Vec<ProfileHits>> {
        let work_dir = tempfile::Builder::new()
            .prefix("calfinder-hmmsearch-")
            .tempdir()
            .context("Failed to create hmmsearch work directory")?;
        let fasta = work_dir.path().join("targets.fasta");
        write_fasta(&fasta, sequences)?;

        profiles
            .iter()
            .map(|profile| self.search_profile(&fasta, profile, work_dir.path(), options))
            .collect()
    }

    fn version(&self) -> Result<String> {
        query_version(Tool::Hmmsearch, &self.binary_path)
    }

    fn is_available(&self) -> bool {
        self.binary_path.exists()
    }
}

/// Parse a `--domtblout` table into per-target hits.
///
/// One row per domain; rows of the same target are grouped and targets
/// keep the order in which they first appear.
pub fn parse_domtblout(text: &str) -> Result<Vec<TargetHit>, String> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut targets: Vec<TargetHit> = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 22 {
            return Err(format!(
                "line {}: expected at least 22 columns, found {}",
                lineno + 1,
                fields.len()
            ));
        }

        let num = |col: usize| -> Result<usize, String> {
            fields[col]
                .parse::<usize>()
                .map_err(|_| format!("line {}: bad integer '{}'", lineno + 1, fields[col]))
        };
        let float = |col: usize| -> Result<f64, String> {
            fields[col]
                .parse::<f64>()
                .map_err(|_| format!("line {}: bad number '{}'", lineno + 1, fields[col]))
        };

        // Columns: 0 target, 2 tlen, 3 query, 5 qlen, 6 full E-value,
        // 12 i-Evalue, 15/16 hmm from/to, 17/18 ali from/to
        let domain = DomainAlignment {
            i_evalue: float(12)?,
            ali_from: num(17)?,
            ali_to: num(18)?,
            hmm_from: num(15)?,
            hmm_to: num(16)?,
            profile_length: num(5)?,
        };

        let target = fields[0];
        let slot = match index.get(target) {
            Some(&slot) => slot,
            None => {
                targets.push(TargetHit {
                    target: target.to_string(),
                    evalue: float(6)?,
                    domains: Vec::new(),
                });
                index.insert(target.to_string(), targets.len() - 1);
                targets.len() - 1
            }
        };
        targets[slot].domains.push(domain);
    }

    Ok(targets)
}

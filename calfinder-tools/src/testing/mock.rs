//! Scripted collaborators for exercising the pipeline without HMMER or BLAST

use crate::traits::{Aligner, ProfileHits, ProfileSearcher, SearchOptions, TabularHit};
use anyhow::Result;
use calfinder_bio::sequence::Sequence;
use calfinder_core::CalfError;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Searcher that answers from canned per-profile results.
///
/// Results are keyed by profile file stem (`GlyX3.hmm` -> `GlyX3`). Like a
/// real search, hits on targets not in the searched set are left out.
#[derive(Debug, Default)]
pub struct MockSearcher {
    results: HashMap<String, ProfileHits>,
    /// Profile stems and target counts of every call, in order
    pub calls: Vec<(Vec<String>, usize)>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, hits: ProfileHits) -> Self {
        self.results.insert(hits.profile.clone(), hits);
        self
    }
}

fn profile_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl ProfileSearcher for MockSearcher {
    fn search(
        &mut self,
        sequences: &[Sequence],
        profiles: &[PathBuf],
        _options: &SearchOptions,
    ) -> Result<Vec<ProfileHits>> {
        let stems: Vec<String> = profiles.iter().map(|p| profile_stem(p)).collect();
        self.calls.push((stems.clone(), sequences.len()));

        let searched: HashSet<&str> = sequences.iter().map(|s| s.id.as_str()).collect();
        stems
            .iter()
            .map(|stem| -> Result<ProfileHits> {
                let canned = self.results.get(stem).ok_or_else(|| {
                    CalfError::NotFound(format!("no scripted results for profile {}", stem))
                })?;
                Ok(ProfileHits {
                    profile: canned.profile.clone(),
                    profile_length: canned.profile_length,
                    hits: canned
                        .hits
                        .iter()
                        .filter(|h| searched.contains(h.target.as_str()))
                        .cloned()
                        .collect(),
                })
            })
            .collect()
    }

    fn version(&self) -> Result<String> {
        Ok("MockSearcher 1.0.0".to_string())
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
enum Script {
    Hits(Vec<TabularHit>),
    Unparsable,
    Fails(String),
}

/// Aligner that replays scripted output
#[derive(Debug)]
pub struct MockAligner {
    script: Script,
    /// Number of align calls made
    pub calls: usize,
}

impl Default for MockAligner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAligner {
    /// An aligner that never finds anything
    pub fn new() -> Self {
        Self::with_hits(Vec::new())
    }

    pub fn with_hits(hits: Vec<TabularHit>) -> Self {
        Self {
            script: Script::Hits(hits),
            calls: 0,
        }
    }

    /// Behaves like a run whose output could not be read
    pub fn unparsable() -> Self {
        Self {
            script: Script::Unparsable,
            calls: 0,
        }
    }

    /// Behaves like a crashed run
    pub fn failing(message: &str) -> Self {
        Self {
            script: Script::Fails(message.to_string()),
            calls: 0,
        }
    }
}

impl Aligner for MockAligner {
    fn align(&mut self, _query: &Path, _subject: &Path, _evalue: f64) -> Result<Vec<TabularHit>> {
        self.calls += 1;
        match &self.script {
            Script::Hits(hits) => Ok(hits.clone()),
            Script::Unparsable => Err(CalfError::Parse("line 1: garbage".to_string()).into()),
            Script::Fails(message) => Err(CalfError::tool("blastp", message.clone()).into()),
        }
    }

    fn version(&self) -> Result<String> {
        Ok("MockAligner 1.0.0".to_string())
    }

    fn is_available(&self) -> bool {
        true
    }
}

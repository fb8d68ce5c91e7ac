//! Result shapes reported by the external search and alignment tools.
//!
//! Coordinates are 1-based inclusive, the way HMMER and BLAST report them.

use std::collections::HashMap;

/// One domain alignment of a profile against a target
#[derive(Debug, Clone, PartialEq)]
pub struct DomainAlignment {
    /// Independent E-value of this domain
    pub i_evalue: f64,
    pub ali_from: usize,
    pub ali_to: usize,
    pub hmm_from: usize,
    pub hmm_to: usize,
    pub profile_length: usize,
}

/// All domains of one profile on one target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetHit {
    pub target: String,
    /// Full-sequence E-value
    pub evalue: f64,
    pub domains: Vec<DomainAlignment>,
}

/// Hits of one profile, targets in reporting order
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileHits {
    pub profile: String,
    pub profile_length: usize,
    pub hits: Vec<TargetHit>,
}

/// Per-target view of a search: which profiles hit it, and how
#[derive(Debug, Clone)]
pub struct TargetView<'a> {
    pub target: &'a str,
    pub hits: Vec<(&'a ProfileHits, &'a TargetHit)>,
}

/// Regroup per-profile results by target; targets keep first-seen order
pub fn group_by_target(results: &[ProfileHits]) -> Vec<TargetView<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut views: Vec<TargetView<'_>> = Vec::new();

    for profile in results {
        for hit in &profile.hits {
            let slot = *index.entry(hit.target.as_str()).or_insert_with(|| {
                views.push(TargetView {
                    target: hit.target.as_str(),
                    hits: Vec::new(),
                });
                views.len() - 1
            });
            views[slot].hits.push((profile, hit));
        }
    }

    views
}

/// One row of BLAST tabular output
#[derive(Debug, Clone, PartialEq)]
pub struct TabularHit {
    pub query_id: String,
    pub subject_id: String,
    pub query_length: usize,
    pub subject_length: usize,
    pub evalue: f64,
    pub bit_score: f64,
    pub identity: f64,
    pub query_start: usize,
    pub query_end: usize,
    pub subject_start: usize,
    pub subject_end: usize,
}

impl TabularHit {
    /// Fraction of the subject spanned by the alignment, `(send - sstart) / slen`
    pub fn coverage(&self) -> f64 {
        if self.subject_length == 0 {
            return 0.0;
        }
        self.subject_end.abs_diff(self.subject_start) as f64 / self.subject_length as f64
    }
}

//! Per-residue resolution of competing domain alignments.
//!
//! Every residue is assigned to the lowest E-value alignment covering it;
//! runs of residues with the same assignment become one interval. The scan
//! is O(L x H) for a sequence of length L and H alignments. H is bounded by
//! the handful of glycine zipper profiles, so the plain scan is kept.

use super::hit::Hit;
use super::records::DomainAlignment;
use calfinder_core::FeatureClass;

/// A domain alignment reduced to what the resolver needs.
///
/// `[start, end)` is 0-based half-open on the target sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainTuple {
    pub evalue: f64,
    pub domain: String,
    pub start: usize,
    pub end: usize,
    pub profile_length: usize,
}

impl DomainTuple {
    /// Convert a 1-based inclusive alignment to the resolver's half-open span
    pub fn from_alignment(domain: &str, alignment: &DomainAlignment) -> Self {
        Self {
            evalue: alignment.i_evalue,
            domain: domain.to_string(),
            start: alignment.ali_from.saturating_sub(1),
            end: alignment.ali_to,
            profile_length: alignment.profile_length,
        }
    }

    fn covers(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Stable sort by E-value, so equal E-values keep their input order
pub fn sort_tuples(tuples: &mut [DomainTuple]) {
    tuples.sort_by(|a, b| a.evalue.total_cmp(&b.evalue));
}

/// Partition `1..=seq_len` into labelled and linker intervals.
///
/// `tuples` must already be sorted with [`sort_tuples`]; the first tuple
/// covering a residue wins it. Output hits are 1-based inclusive, in
/// position order, and tile the sequence without gaps.
pub fn deoverlap(seqid: &str, seq_len: usize, tuples: &[DomainTuple]) -> Vec<Hit> {
    let mut hits = Vec::new();
    if seq_len == 0 {
        return hits;
    }

    let winner = |pos: usize| tuples.iter().find(|t| t.covers(pos));

    let mut run_start = 0;
    let mut run_owner = winner(0);

    for pos in 1..seq_len {
        let owner = winner(pos);
        let label = owner.map(|t| t.domain.as_str());
        if label != run_owner.map(|t| t.domain.as_str()) {
            hits.push(interval(seqid, run_start, pos - 1, run_owner));
            run_start = pos;
            run_owner = owner;
        }
    }
    hits.push(interval(seqid, run_start, seq_len - 1, run_owner));

    hits
}

/// Build the hit for 0-based inclusive `[first, last]`
fn interval(seqid: &str, first: usize, last: usize, owner: Option<&DomainTuple>) -> Hit {
    let residues = last - first + 1;
    Hit {
        seqid: seqid.to_string(),
        domid: owner.map(|t| t.domain.clone()),
        start: first + 1,
        end: last + 1,
        evalue: owner.map(|t| t.evalue),
        coverage: owner
            .filter(|t| t.profile_length > 0)
            .map(|t| residues as f64 / t.profile_length as f64),
        desc: FeatureClass::Glyzip,
        src: owner.map(|t| t.domain.clone()).unwrap_or_default(),
    }
}

//! Envelope and profile coverage of one target's domain alignments

use super::hit::Hit;
use super::records::TargetHit;
use calfinder_core::FeatureClass;
use std::collections::BTreeSet;

/// Which domains take part in a reduction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Only domains with `i_evalue` strictly below the value
    Strict(f64),
    /// Every reported domain
    Lenient,
}

impl Threshold {
    fn admits(&self, i_evalue: f64) -> bool {
        match self {
            Threshold::Strict(limit) => i_evalue < *limit,
            Threshold::Lenient => true,
        }
    }
}

/// Envelope on the target (1-based inclusive) and cumulative profile coverage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSpan {
    pub start: usize,
    pub end: usize,
    pub coverage: f64,
}

/// Reduce one target hit to its envelope; `None` when no domain qualifies.
///
/// Coverage counts each profile position once, however many qualifying
/// domains overlap it.
pub fn reduce_target(hit: &TargetHit, threshold: Threshold) -> Option<TargetSpan> {
    let qualifying: Vec<_> = hit
        .domains
        .iter()
        .filter(|d| threshold.admits(d.i_evalue))
        .collect();

    let start = qualifying.iter().map(|d| d.ali_from).min()?;
    let end = qualifying.iter().map(|d| d.ali_to).max()?;

    let profile_length = qualifying.iter().map(|d| d.profile_length).max().unwrap_or(0);
    let covered: BTreeSet<usize> = qualifying
        .iter()
        .flat_map(|d| d.hmm_from.max(1)..=d.hmm_to.min(profile_length))
        .collect();
    let coverage = if profile_length == 0 {
        0.0
    } else {
        covered.len() as f64 / profile_length as f64
    };

    Some(TargetSpan {
        start,
        end,
        coverage,
    })
}

/// Outcome of the triplication stage for one target
#[derive(Debug, Clone, PartialEq)]
pub struct TriplicationCall {
    pub seqid: String,
    pub profile: String,
    pub evalue: f64,
    pub span: TargetSpan,
    /// The full-sequence E-value passed the gate and the strict
    /// domain threshold was applied
    pub significant: bool,
}

impl TriplicationCall {
    /// Apply the significance gate to a triplication profile hit.
    ///
    /// Hits with a full-sequence E-value below `evalue_gate` are reduced
    /// with `Strict(i_evalue)`; the rest get a lenient envelope that is
    /// reported but never called positive.
    pub fn from_hit(
        hit: &TargetHit,
        profile: &str,
        evalue_gate: f64,
        i_evalue: f64,
    ) -> Option<Self> {
        let significant = hit.evalue < evalue_gate;
        let threshold = if significant {
            Threshold::Strict(i_evalue)
        } else {
            Threshold::Lenient
        };

        reduce_target(hit, threshold).map(|span| Self {
            seqid: hit.target.clone(),
            profile: profile.to_string(),
            evalue: hit.evalue,
            span,
            significant,
        })
    }

    /// Whether the sequence moves on to glycine zipper annotation
    pub fn passes(&self, min_coverage: f64) -> bool {
        self.significant && self.span.coverage > min_coverage
    }

    pub fn to_hit(&self) -> Hit {
        Hit {
            seqid: self.seqid.clone(),
            domid: Some(self.profile.clone()),
            start: self.span.start,
            end: self.span.end,
            evalue: Some(self.evalue),
            coverage: Some(self.span.coverage),
            desc: FeatureClass::Cter,
            src: self.profile.clone(),
        }
    }
}

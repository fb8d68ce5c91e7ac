//! Rule-based classification of a sequence's domain architecture

use super::hit::Hit;
use calfinder_core::{is_known_nter, CalfError, FeatureClass};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Final category assigned to a triplication-positive sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    CalcyaninKnownNter,
    CalcyaninNewNter,
    AtypicalKnownNter,
    AtypicalNewNter,
    Ancestral,
}

impl Flag {
    pub const ALL: [Flag; 5] = [
        Flag::CalcyaninKnownNter,
        Flag::CalcyaninNewNter,
        Flag::AtypicalKnownNter,
        Flag::AtypicalNewNter,
        Flag::Ancestral,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Flag::CalcyaninKnownNter => "Calcyanin with known N-ter",
            Flag::CalcyaninNewNter => "Calcyanin with new N-ter",
            Flag::AtypicalKnownNter => "Atypical Gly region with known N-ter",
            Flag::AtypicalNewNter => "Atypical Gly region with new N-ter",
            Flag::Ancestral => "Ancestral gly containing protein",
        }
    }

    /// Only a full calcyanin with a characterised N-ter needs no manual check
    pub fn is_trusted(&self) -> bool {
        matches!(self, Flag::CalcyaninKnownNter)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Flag {
    type Err = CalfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flag::ALL
            .into_iter()
            .find(|flag| flag.label() == s)
            .ok_or_else(|| CalfError::Parse(format!("Unknown flag: {}", s)))
    }
}

/// Map a C-terminal domain string and an N-ter label to a flag.
///
/// Rules are tried in order and the first match wins; pattern tests are
/// substring matches on `cter`.
pub fn classify(cter: &str, nter: &str) -> Flag {
    let known = is_known_nter(nter);

    if cter.contains("Gly1,Gly2,Gly3") {
        if known {
            Flag::CalcyaninKnownNter
        } else {
            Flag::CalcyaninNewNter
        }
    } else if cter.contains("Gly1,Gly3") && nter == "Y-type" {
        Flag::CalcyaninKnownNter
    } else if ["Gly1", "Gly2", "Gly3"].iter().any(|g| cter.contains(g)) {
        if known {
            Flag::AtypicalKnownNter
        } else {
            Flag::AtypicalNewNter
        }
    } else {
        Flag::Ancestral
    }
}

/// Glycine zipper labels ordered by start, comma joined
pub fn cter_string(hits: &[&Hit]) -> String {
    let mut zips: Vec<&&Hit> = hits
        .iter()
        .filter(|h| h.desc == FeatureClass::Glyzip && !h.is_linker())
        .collect();
    zips.sort_by_key(|h| h.start);
    zips.iter().map(|h| h.label()).collect::<Vec<_>>().join(",")
}

/// N-ter labels concatenated; selection leaves at most one per sequence
pub fn nter_string(hits: &[&Hit]) -> String {
    hits.iter()
        .filter(|h| h.desc == FeatureClass::Nter)
        .map(|h| h.label())
        .collect()
}

/// One line of the final summary
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub accession: String,
    pub flag: Flag,
    pub nter: String,
    pub cter: String,
}

impl SummaryRow {
    pub fn is_trusted(&self) -> bool {
        self.flag.is_trusted()
    }
}

/// Group every annotation by sequence and classify each sequence.
///
/// Rows come out sorted by accession.
pub fn summarize(hits: &[Hit]) -> Vec<SummaryRow> {
    let mut by_seq: BTreeMap<&str, Vec<&Hit>> = BTreeMap::new();
    for hit in hits {
        by_seq.entry(hit.seqid.as_str()).or_default().push(hit);
    }

    by_seq
        .into_iter()
        .map(|(seqid, group)| {
            let cter = cter_string(&group);
            let nter = nter_string(&group);
            SummaryRow {
                accession: seqid.to_string(),
                flag: classify(&cter, &nter),
                nter,
                cter,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_precedence() {
        let cases = vec![
            ("Gly1,Gly2,Gly3", "CoBaHMA-type", Flag::CalcyaninKnownNter),
            ("Gly1,Gly2,Gly3", "Z-type", Flag::CalcyaninKnownNter),
            ("Gly1,Gly2,Gly3", "", Flag::CalcyaninNewNter),
            ("Gly3,Gly1,Gly2,Gly3", "W-type", Flag::CalcyaninNewNter),
            ("Gly1,Gly3", "Y-type", Flag::CalcyaninKnownNter),
            ("Gly1,Gly3", "X-type", Flag::AtypicalKnownNter),
            ("Gly1,Gly3", "", Flag::AtypicalNewNter),
            ("Gly2", "X-type", Flag::AtypicalKnownNter),
            ("Gly3,Gly3", "", Flag::AtypicalNewNter),
            ("", "Y-type", Flag::Ancestral),
            ("", "", Flag::Ancestral),
        ];

        for (cter, nter, expected) in cases {
            assert_eq!(classify(cter, nter), expected, "cter={:?} nter={:?}", cter, nter);
        }
    }

    #[test]
    fn test_flag_labels_round_trip() {
        for flag in Flag::ALL {
            assert_eq!(flag.to_string().parse::<Flag>().unwrap(), flag);
        }
        assert!("Calcyanin".parse::<Flag>().is_err());
        assert!(Flag::CalcyaninKnownNter.is_trusted());
        assert!(Flag::ALL.iter().filter(|f| f.is_trusted()).count() == 1);
    }

    fn hit(seqid: &str, domid: &str, start: usize, desc: FeatureClass) -> Hit {
        Hit {
            seqid: seqid.to_string(),
            domid: Some(domid.to_string()),
            start,
            end: start + 30,
            evalue: Some(1e-10),
            coverage: Some(0.9),
            desc,
            src: domid.to_string(),
        }
    }

    #[test]
    fn test_summarize_groups_and_orders() {
        let hits = vec![
            hit("seqB", "GlyX3", 200, FeatureClass::Cter),
            hit("seqB", "Gly3", 300, FeatureClass::Glyzip),
            hit("seqB", "Gly1", 200, FeatureClass::Glyzip),
            hit("seqB", "Gly2", 250, FeatureClass::Glyzip),
            hit("seqB", "Y-type", 1, FeatureClass::Nter),
            hit("seqA", "GlyX3", 150, FeatureClass::Cter),
            hit("seqA", "Gly2", 160, FeatureClass::Glyzip),
        ];

        let rows = summarize(&hits);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].accession, "seqA");
        assert_eq!(rows[0].cter, "Gly2");
        assert_eq!(rows[0].nter, "");
        assert_eq!(rows[0].flag, Flag::AtypicalNewNter);

        assert_eq!(rows[1].accession, "seqB");
        assert_eq!(rows[1].cter, "Gly1,Gly2,Gly3");
        assert_eq!(rows[1].nter, "Y-type");
        assert!(rows[1].is_trusted());
    }

    #[test]
    fn test_cter_only_sequence_is_ancestral() {
        let rows = summarize(&[hit("seqC", "GlyX3", 10, FeatureClass::Cter)]);
        assert_eq!(rows[0].flag, Flag::Ancestral);
        assert_eq!(rows[0].cter, "");
    }
}

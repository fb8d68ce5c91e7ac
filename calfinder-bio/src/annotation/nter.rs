//! N-terminal classification by nearest reference neighbour

use super::hit::Hit;
use super::records::TabularHit;
use calfinder_core::{CalfError, CalfResult, FeatureClass};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A reference N-ter: its type and, when known, the source organism
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NterEntry {
    pub nter_type: String,
    pub organism: Option<String>,
}

/// Reference subject id to N-ter type
#[derive(Debug, Clone, Default)]
pub struct NterMapping {
    entries: HashMap<String, NterEntry>,
}

impl NterMapping {
    /// Load a whitespace-delimited `<type> <subject_id> [organism...]` table
    pub fn load<P: AsRef<Path>>(path: P) -> CalfResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                CalfError::NotFound(format!("N-ter mapping file {}", path.display()))
            }
            _ => CalfError::Io(e),
        })?;
        Self::parse(&text)
            .map_err(|e| CalfError::Parse(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let mut entries = HashMap::new();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (nter_type, subject) = match (fields.next(), fields.next()) {
                (Some(t), Some(s)) => (t, s),
                _ => return Err(format!("line {}: expected '<type> <subject_id>'", lineno + 1)),
            };
            let organism = fields.collect::<Vec<_>>().join(" ");

            entries.insert(
                subject.to_string(),
                NterEntry {
                    nter_type: nter_type.to_string(),
                    organism: (!organism.is_empty()).then_some(organism),
                },
            );
        }

        Ok(Self { entries })
    }

    pub fn get(&self, subject: &str) -> Option<&NterEntry> {
        self.entries.get(subject)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pick the best mapped reference for every query.
///
/// Alignments to unmapped subjects are dropped, then those with
/// `evalue <= max_evalue` and `coverage() > min_coverage` are kept. Among
/// them the lowest E-value wins per query; ties keep the aligner's order.
pub fn select_nearest(
    alignments: &[TabularHit],
    mapping: &NterMapping,
    max_evalue: f64,
    min_coverage: f64,
) -> Vec<Hit> {
    let mut candidates: Vec<(&TabularHit, &NterEntry)> = alignments
        .iter()
        .filter_map(|aln| mapping.get(&aln.subject_id).map(|entry| (aln, entry)))
        .filter(|(aln, _)| aln.evalue <= max_evalue && aln.coverage() > min_coverage)
        .collect();
    candidates.sort_by(|a, b| a.0.evalue.total_cmp(&b.0.evalue));

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|&(aln, _)| seen.insert(aln.query_id.as_str()))
        .map(|(aln, entry)| Hit {
            seqid: aln.query_id.clone(),
            domid: Some(entry.nter_type.clone()),
            start: aln.query_start,
            end: aln.query_end,
            evalue: Some(aln.evalue),
            coverage: Some(aln.coverage()),
            desc: FeatureClass::Nter,
            src: entry
                .organism
                .clone()
                .unwrap_or_else(|| aln.subject_id.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAPPING: &str = "\
# type subject organism
CoBaHMA-type ref1 Gloeomargarita lithophora
Y-type ref2

X-type ref3 Synechococcus calcipolaris G9
";

    fn aln(query: &str, subject: &str, evalue: f64, sstart: usize, send: usize) -> TabularHit {
        TabularHit {
            query_id: query.to_string(),
            subject_id: subject.to_string(),
            query_length: 600,
            subject_length: 100,
            evalue,
            bit_score: 100.0,
            identity: 60.0,
            query_start: 3,
            query_end: 98,
            subject_start: sstart,
            subject_end: send,
        }
    }

    #[test]
    fn test_parse_mapping() {
        let mapping = NterMapping::parse(MAPPING).unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(
            mapping.get("ref1").unwrap().organism.as_deref(),
            Some("Gloeomargarita lithophora")
        );
        assert_eq!(mapping.get("ref2").unwrap().nter_type, "Y-type");
        assert_eq!(mapping.get("ref2").unwrap().organism, None);
        assert!(mapping.get("ref9").is_none());
    }

    #[test]
    fn test_parse_mapping_rejects_short_lines() {
        let err = NterMapping::parse("Y-type ref2\nZ-type\n").unwrap_err();
        assert!(err.contains("line 2"));
    }

    #[test]
    fn test_missing_mapping_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = NterMapping::load(dir.path().join("nterdb.tsv"));
        assert!(matches!(result, Err(CalfError::NotFound(_))));
    }

    #[test]
    fn test_select_nearest_keeps_lowest_evalue_per_query() {
        let mapping = NterMapping::parse(MAPPING).unwrap();
        let alignments = vec![
            aln("q1", "ref2", 1e-20, 1, 95),
            aln("q1", "ref1", 1e-40, 1, 95),
            aln("q2", "ref3", 1e-12, 5, 95),
            aln("q2", "unmapped", 1e-60, 1, 99),
            aln("q3", "ref1", 1e-5, 1, 99),
            aln("q4", "ref2", 1e-30, 20, 90),
        ];

        let hits = select_nearest(&alignments, &mapping, 1e-7, 0.80);
        let got: Vec<(&str, &str, &str)> = hits
            .iter()
            .map(|h| (h.seqid.as_str(), h.label(), h.src.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("q1", "CoBaHMA-type", "Gloeomargarita lithophora"),
                ("q2", "X-type", "Synechococcus calcipolaris G9"),
            ]
        );
        assert!(hits.iter().all(|h| h.desc == FeatureClass::Nter));
        assert_eq!((hits[0].start, hits[0].end), (3, 98));
        assert!((hits[0].coverage.unwrap() - 0.94).abs() < 1e-12);
    }

    #[test]
    fn test_src_falls_back_to_subject() {
        let mapping = NterMapping::parse(MAPPING).unwrap();
        let hits = select_nearest(&[aln("q1", "ref2", 1e-9, 1, 90)], &mapping, 1e-7, 0.80);
        assert_eq!(hits[0].src, "ref2");
    }
}

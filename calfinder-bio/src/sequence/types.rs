use calfinder_core::{CalfError, CalfResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A translated protein sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl Sequence {
    pub fn new(id: String, sequence: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            sequence,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn header(&self) -> String {
        match &self.description {
            Some(desc) if !desc.is_empty() => format!(">{} {}", self.id, desc),
            _ => format!(">{}", self.id),
        }
    }

    /// Reject anything outside the protein alphabet (letters, stop `*`, gap `-`)
    pub fn validate_residues(&self) -> CalfResult<()> {
        match self
            .sequence
            .iter()
            .position(|&aa| !(aa.is_ascii_alphabetic() || aa == b'*' || aa == b'-'))
        {
            None => Ok(()),
            Some(pos) => Err(CalfError::InvalidInput(format!(
                "Illegal character {:?} at position {} in sequence {}",
                self.sequence[pos] as char,
                pos + 1,
                self.id
            ))),
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_construction() {
        let seq = Sequence::new("test_id".to_string(), b"MKVL".to_vec());
        assert_eq!(seq.id, "test_id");
        assert_eq!(seq.sequence, b"MKVL");
        assert!(seq.description.is_none());
        assert_eq!(seq.len(), 4);
        assert!(!seq.is_empty());
    }

    #[test]
    fn test_header_formatting() {
        let plain = Sequence::new("WP_001".to_string(), b"M".to_vec());
        assert_eq!(plain.header(), ">WP_001");

        let described = plain.with_description("calcyanin [Gloeomargarita]".to_string());
        assert_eq!(described.header(), ">WP_001 calcyanin [Gloeomargarita]");
    }

    #[test]
    fn test_residue_validation() {
        let cases = vec![
            (b"ACDEFGHIKLMNPQRSTVWY".to_vec(), true),
            (b"MKV*".to_vec(), true),
            (b"MK-VL".to_vec(), true),
            (b"BJOUXZ".to_vec(), true),
            (b"MK1VL".to_vec(), false),
            (b"MK VL".to_vec(), false),
            (b"MK.VL".to_vec(), false),
        ];

        for (residues, valid) in cases {
            let seq = Sequence::new("s".to_string(), residues.clone());
            assert_eq!(
                seq.validate_residues().is_ok(),
                valid,
                "validation mismatch for {:?}",
                String::from_utf8_lossy(&residues)
            );
        }
    }

    #[test]
    fn test_validation_error_names_sequence_and_character() {
        let seq = Sequence::new("bad_seq".to_string(), b"MKV#L".to_vec());
        match seq.validate_residues() {
            Err(CalfError::InvalidInput(msg)) => {
                assert!(msg.contains("bad_seq"));
                assert!(msg.contains("'#'"));
                assert!(msg.contains("position 4"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}

//! N-terminal domain types recognised by the classifier

/// N-ter types with a characterised calcyanin architecture
pub const KNOWN_NTER_TYPES: [&str; 4] = ["CoBaHMA-type", "Y-type", "X-type", "Z-type"];

/// True when the label names one of the characterised N-ter types
pub fn is_known_nter(label: &str) -> bool {
    KNOWN_NTER_TYPES.contains(&label)
}

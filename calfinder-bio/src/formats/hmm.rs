//! HMMER3 profile header reader
//!
//! Only the header block is read: the profile name and its model length
//! are all the pipeline needs to label hits and compute coverage.

use calfinder_core::{CalfError, CalfResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHeader {
    pub name: String,
    /// Number of match states (`LENG`)
    pub length: usize,
}

/// Read `NAME` and `LENG` from the first profile in a HMMER3 file
pub fn read_profile_header<P: AsRef<Path>>(path: P) -> CalfResult<ProfileHeader> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            CalfError::NotFound(format!("HMM profile {}", path.display()))
        }
        _ => CalfError::Io(e),
    })?;

    parse_profile_header(BufReader::new(file))
        .map_err(|msg| CalfError::Parse(format!("{}: {}", path.display(), msg)))
}

fn parse_profile_header<R: BufRead>(reader: R) -> Result<ProfileHeader, String> {
    let mut lines = reader.lines();

    match lines.next() {
        Some(Ok(first)) if first.starts_with("HMMER3") => {}
        _ => return Err("not a HMMER3 profile".to_string()),
    }

    let mut name = None;
    let mut length = None;

    for line in lines {
        let line = line.map_err(|e| e.to_string())?;
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("NAME") => name = fields.next().map(str::to_string),
            Some("LENG") => {
                let value = fields.next().unwrap_or("");
                length = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid LENG value '{}'", value))?,
                );
            }
            // Main model section; header is over
            Some("HMM") | Some("//") => break,
            _ => {}
        }
    }

    match (name, length) {
        (Some(name), Some(length)) if length > 0 => Ok(ProfileHeader { name, length }),
        (None, _) => Err("missing NAME line".to_string()),
        _ => Err("missing or zero LENG line".to_string()),
    }
}

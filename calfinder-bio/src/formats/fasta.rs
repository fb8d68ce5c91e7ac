use crate::sequence::Sequence;
use calfinder_core::{CalfError, CalfResult};
use flate2::read::GzDecoder;
use memmap2::Mmap;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{line_ending, not_line_ending, space1},
    combinator::opt,
    sequence::preceded,
    IResult,
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Parse a FASTA header line into raw identifier and description bytes
fn parse_header(input: &[u8]) -> IResult<&[u8], (&[u8], Option<&[u8]>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) =
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r')(input)?;
    let (input, description) = opt(preceded(space1, not_line_ending))(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, (id, description)))
}

/// Parse sequence lines until next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;

        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        // A lone '\r' is not a line ending for nom; step over it
        remaining = if rest.len() == remaining.len() {
            &rest[1..]
        } else {
            rest
        };
    }

    Ok((remaining, sequence))
}

/// Parse a single FASTA record; header text is decoded by the caller
fn parse_record(input: &[u8]) -> IResult<&[u8], (&[u8], Option<&[u8]>, Vec<u8>)> {
    let (input, (id, description)) = parse_header(input)?;
    let (input, sequence) = parse_sequence(input)?;
    Ok((input, (id, description, sequence)))
}

/// Decode a header into a sequence, rejecting empty or non UTF-8 identifiers
fn build_record(
    id: &[u8],
    description: Option<&[u8]>,
    residues: Vec<u8>,
    offset: usize,
) -> CalfResult<Sequence> {
    let id = std::str::from_utf8(id).map_err(|_| {
        CalfError::InvalidInput(format!(
            "Sequence identifier at byte {} is not valid UTF-8",
            offset
        ))
    })?;
    if id.is_empty() {
        return Err(CalfError::InvalidInput(format!(
            "Empty sequence identifier at byte {}",
            offset
        )));
    }

    let mut seq = Sequence::new(id.to_string(), residues);
    if let Some(desc) = description {
        let desc = std::str::from_utf8(desc).map_err(|_| {
            CalfError::InvalidInput(format!(
                "Description of {} at byte {} is not valid UTF-8",
                id, offset
            ))
        })?;
        let desc = desc.trim();
        if !desc.is_empty() {
            seq = seq.with_description(desc.to_string());
        }
    }
    Ok(seq)
}

/// Parse FASTA from a byte buffer; records without residues are skipped
pub fn parse_fasta_from_bytes(buffer: &[u8]) -> CalfResult<Vec<Sequence>> {
    let mut input = buffer;
    let mut sequences = Vec::new();

    while !input.is_empty() {
        while !input.is_empty() && input[0].is_ascii_whitespace() {
            input = &input[1..];
        }

        if input.is_empty() {
            break;
        }

        let offset = buffer.len() - input.len();
        match parse_record(input) {
            Ok((remaining, (id, description, residues))) => {
                let seq = build_record(id, description, residues, offset)?;
                if !seq.is_empty() {
                    sequences.push(seq);
                }
                input = remaining;
            }
            Err(_) => {
                return Err(CalfError::Parse(format!(
                    "Expected FASTA header at byte {}",
                    offset
                )));
            }
        }
    }

    Ok(sequences)
}

/// Parse a FASTA file into sequences (supports .gz compression)
pub fn parse_fasta<P: AsRef<Path>>(path: P) -> CalfResult<Vec<Sequence>> {
    let path = path.as_ref();

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        parse_fasta_gzip(path)
    } else {
        parse_fasta_uncompressed(path)
    }
    .map_err(|e| match e {
        CalfError::Parse(msg) => CalfError::Parse(format!("{}: {}", path.display(), msg)),
        CalfError::InvalidInput(msg) => {
            CalfError::InvalidInput(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

fn parse_fasta_uncompressed(path: &Path) -> CalfResult<Vec<Sequence>> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }
    let mmap = unsafe { Mmap::map(&file)? };

    parse_fasta_from_bytes(&mmap[..])
}

fn parse_fasta_gzip(path: &Path) -> CalfResult<Vec<Sequence>> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut buffer = Vec::new();
    decoder.read_to_end(&mut buffer)?;

    parse_fasta_from_bytes(&buffer)
}

/// Files under `dir` whose name ends with `extension`, sorted by path
pub fn list_input_files(dir: &Path, extension: &str) -> CalfResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(extension));
        if path.is_file() && matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load the sequences to annotate from a FASTA file or a directory of them.
///
/// Directories contribute every file ending with `extension`, in sorted
/// order. Residues are validated against the protein alphabet. When an
/// identifier appears more than once the first record is kept.
pub fn read_fasta_input<P: AsRef<Path>>(path: P, extension: &str) -> CalfResult<Vec<Sequence>> {
    let path = path.as_ref();

    let files = if path.is_dir() {
        let files = list_input_files(path, extension)?;
        if files.is_empty() {
            return Err(CalfError::NotFound(format!(
                "No *{} files in {}",
                extension,
                path.display()
            )));
        }
        files
    } else if path.exists() {
        vec![path.to_path_buf()]
    } else {
        return Err(CalfError::NotFound(format!(
            "Input not found: {}",
            path.display()
        )));
    };

    let parsed: Vec<Vec<Sequence>> = files
        .par_iter()
        .map(parse_fasta)
        .collect::<CalfResult<_>>()?;

    let mut seen = HashSet::new();
    let mut sequences = Vec::new();
    for seq in parsed.into_iter().flatten() {
        seq.validate_residues()?;
        if seen.insert(seq.id.clone()) {
            sequences.push(seq);
        } else {
            tracing::warn!("Duplicate sequence identifier {}; keeping first record", seq.id);
        }
    }

    tracing::debug!(
        "Loaded {} sequences from {} file(s)",
        sequences.len(),
        files.len()
    );
    Ok(sequences)
}

/// Write sequences to a FASTA file (supports .gz compression)
pub fn write_fasta<P: AsRef<Path>>(path: P, sequences: &[Sequence]) -> CalfResult<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let path = path.as_ref();
    let file = File::create(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let encoder = GzEncoder::new(file, Compression::default());
        let mut writer = BufWriter::new(encoder);
        write_fasta_to_writer(&mut writer, sequences)?;
        writer.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        write_fasta_to_writer(&mut writer, sequences)?;
        writer.flush()?;
    }

    Ok(())
}

/// Write sequences as 80-column records to any writer
pub fn write_fasta_to_writer<W: Write>(writer: &mut W, sequences: &[Sequence]) -> CalfResult<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Only show progress for large datasets
    let pb = if sequences.len() > 10_000 && std::env::var("CALFINDER_SILENT").is_err() {
        let pb = ProgressBar::new(sequences.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} sequences")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        Some(pb)
    } else {
        None
    };

    let processed = AtomicUsize::new(0);

    let chunks: Vec<Vec<u8>> = sequences
        .par_chunks(1000)
        .map(|chunk_sequences| {
            let estimated: usize = chunk_sequences
                .iter()
                .map(|s| s.id.len() + s.description.as_ref().map_or(0, |d| d.len() + 1) + s.len() + s.len() / 80 + 4)
                .sum();
            let mut buffer = Vec::with_capacity(estimated);

            for seq in chunk_sequences {
                buffer.extend_from_slice(seq.header().as_bytes());
                buffer.push(b'\n');
                for line in seq.sequence.chunks(80) {
                    buffer.extend_from_slice(line);
                    buffer.push(b'\n');
                }
            }

            let done = processed.fetch_add(chunk_sequences.len(), Ordering::Relaxed);
            if let Some(ref pb) = pb {
                pb.set_position((done + chunk_sequences.len()) as u64);
            }
            buffer
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    for chunk in chunks {
        writer.write_all(&chunk)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header() {
        let input = b">WP_012345.1 calcyanin [Gloeomargarita lithophora]\nMKV";
        let (remaining, (id, desc)) = parse_header(input).unwrap();
        assert_eq!(id, b"WP_012345.1");
        assert_eq!(desc, Some(&b"calcyanin [Gloeomargarita lithophora]"[..]));
        assert_eq!(remaining, b"MKV");
    }

    #[test]
    fn test_parse_header_tab_and_eof() {
        let (_, (id, desc)) = parse_header(b">seq1\tsome protein").unwrap();
        assert_eq!(id, b"seq1");
        assert_eq!(desc, Some(&b"some protein"[..]));

        let (_, (id, desc)) = parse_header(b">seq2").unwrap();
        assert_eq!(id, b"seq2");
        assert_eq!(desc, None);
    }

    #[test]
    fn test_parse_sequence_joins_wrapped_lines() {
        let (remaining, seq) = parse_sequence(b"mkvl\r\nGGAG\n\nTT\n>next\n").unwrap();
        assert_eq!(seq, b"MKVLGGAGTT");
        assert_eq!(remaining, b">next\n");
    }

    #[test]
    fn test_parse_multiple_records() {
        let input = b">seq1 first\nMKV\n>seq2\nGGA\nGGA\n\n>empty\n>seq3 third\nLLL";
        let result = parse_fasta_from_bytes(input).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].id, "seq1");
        assert_eq!(result[0].description.as_deref(), Some("first"));
        assert_eq!(result[1].sequence, b"GGAGGA");
        assert_eq!(result[2].id, "seq3");
        assert_eq!(result[2].sequence, b"LLL");
    }

    #[test]
    fn test_missing_header_is_parse_error() {
        let result = parse_fasta_from_bytes(b"MKVL\n>seq1\nMKV\n");
        assert!(matches!(result, Err(CalfError::Parse(_))));
    }

    #[test]
    fn test_empty_identifier_is_rejected() {
        let result = parse_fasta_from_bytes(b">seq1\nMKV\n> no id\nGGA\n");
        match result {
            Err(CalfError::InvalidInput(msg)) => assert!(msg.contains("byte 10"), "{}", msg),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_write_wraps_at_80_columns() {
        let seq = Sequence::new("long".to_string(), vec![b'G'; 170]);
        let mut out = Vec::new();
        write_fasta_to_writer(&mut out, &[seq]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], ">long");
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[2].len(), 80);
        assert_eq!(lines[3].len(), 10);
    }
}

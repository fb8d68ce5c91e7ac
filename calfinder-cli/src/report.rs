//! Feature tables, summary CSV and the output directory layout

use calfinder_bio::annotation::{Hit, SummaryRow};
use calfinder_core::{CalfError, CalfResult};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const FEATURE_COLUMNS: [&str; 8] = [
    "seqid", "domid", "start", "end", "evalue", "coverage", "desc", "src",
];
pub const SUMMARY_COLUMNS: [&str; 5] = ["accession", "flag", "nter", "cter", "is_trusted"];

/// Files written under the `--output` directory
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory tree; existing files are overwritten later
    pub fn create(&self) -> CalfResult<()> {
        std::fs::create_dir_all(self.fasta_dir())?;
        std::fs::create_dir_all(self.intermediates_dir())?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fasta_dir(&self) -> PathBuf {
        self.root.join("fastas")
    }

    pub fn intermediates_dir(&self) -> PathBuf {
        self.root.join("intermediates")
    }

    pub fn glyx3_fasta(&self) -> PathBuf {
        self.fasta_dir().join("glyx3seq.fasta")
    }

    /// Per-stage table, e.g. `intermediate("calglyzip")`
    pub fn intermediate(&self, stage: &str) -> PathBuf {
        self.intermediates_dir().join(format!("{}.tsv", stage))
    }

    pub fn features(&self) -> PathBuf {
        self.root.join("features.tsv")
    }

    pub fn summary(&self) -> PathBuf {
        self.root.join("summary.csv")
    }

    pub fn run_json(&self) -> PathBuf {
        self.root.join("run.json")
    }
}

fn csv_error(path: &Path, err: csv::Error) -> CalfError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CalfError::Io(io),
            other => CalfError::Parse(format!("{}: {:?}", path.display(), other)),
        }
    } else {
        CalfError::Parse(format!("{}: {}", path.display(), err))
    }
}

fn open_input(path: &Path) -> CalfResult<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CalfError::NotFound(path.display().to_string()),
        _ => CalfError::Io(e),
    })
}

/// Tab-separated feature table; the header is written even with no hits
pub fn write_features_to_writer<W: Write>(writer: W, hits: &[Hit]) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);
    out.write_record(FEATURE_COLUMNS)?;
    for hit in hits {
        out.serialize(hit)?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_features<P: AsRef<Path>>(path: P, hits: &[Hit]) -> CalfResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_features_to_writer(file, hits).map_err(|e| csv_error(path, e))
}

/// Load a feature table written by `write_features`
pub fn read_features<P: AsRef<Path>>(path: P) -> CalfResult<Vec<Hit>> {
    let path = path.as_ref();
    let file = open_input(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    if headers.iter().ne(FEATURE_COLUMNS.iter().copied()) {
        return Err(CalfError::Parse(format!(
            "{}: expected columns '{}', found '{}'",
            path.display(),
            FEATURE_COLUMNS.join(" "),
            headers.iter().collect::<Vec<_>>().join(" ")
        )));
    }

    reader
        .deserialize::<Hit>()
        .map(|record| record.map_err(|e| csv_error(path, e)))
        .collect()
}

pub fn trust_label(row: &SummaryRow) -> &'static str {
    if row.is_trusted() {
        "checked"
    } else {
        "verification required"
    }
}

/// `;`-separated summary, one row per accession
pub fn write_summary_to_writer<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);
    out.write_record(SUMMARY_COLUMNS)?;
    for row in rows {
        out.write_record([
            row.accession.as_str(),
            row.flag.label(),
            row.nter.as_str(),
            row.cter.as_str(),
            trust_label(row),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_summary<P: AsRef<Path>>(path: P, rows: &[SummaryRow]) -> CalfResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_summary_to_writer(file, rows).map_err(|e| csv_error(path, e))
}

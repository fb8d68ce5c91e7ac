#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to run the calfinder binary with a clean environment
pub fn calfinder_cmd() -> Command {
    let mut cmd = Command::cargo_bin("calfinder").unwrap();
    cmd.env_remove("CALFINDER_CONFIG")
        .env("CALFINDER_SILENT", "1")
        .env("CALFINDER_LOG", "warn");
    cmd
}

/// hmmsearch stand-in: copies `<profile>.tbl` to the `--domtblout` target
pub const HMMSEARCH_SCRIPT: &str = r##"#!/bin/sh
if [ "$1" = "-h" ]; then
    echo "# HMMER 3.3.2 (Nov 2020); http://hmmer.org/"
    exit 0
fi
tbl=""
prev=""
last=""
while [ "$#" -gt 0 ]; do
    case "$1" in
        --domtblout) shift; tbl="$1" ;;
        -o) shift; : > "$1" ;;
    esac
    prev="$last"
    last="$1"
    shift
done
cp "$prev.tbl" "$tbl"
"##;

/// blastp stand-in printing one tabular alignment for seqA
pub const BLASTP_SCRIPT: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
    echo "blastp: 2.12.0+"
    exit 0
fi
printf 'seqA\tref2\t300\t100\t1e-20\t80\t60.0\t1\t98\t1\t95\n'
"#;

pub const FAILING_BLASTP_SCRIPT: &str = "#!/bin/sh\necho 'BLAST engine error: out of memory' >&2\nexit 3\n";

const TBL_HEADER: &str = "# target name accession tlen query name accession qlen E-value score bias # of c-Evalue i-Evalue score bias from to from to from to acc description\n";

/// Scratch directory holding tools, profiles, reference data and a config
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let data_dir = temp_dir.path().join("data");
        let output_dir = temp_dir.path().join("results");
        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            temp_dir,
            data_dir,
            output_dir,
        })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write an executable shell script standing in for a real tool
    #[cfg(unix)]
    pub fn install_tool(&self, name: &str, script: &str) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.temp_dir.path().join(name);
        fs::write(&path, script)?;
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms)?;
        Ok(path)
    }

    /// Profile file plus the canned domain table the hmmsearch stand-in returns
    pub fn write_profile(&self, name: &str, length: usize, rows: &[&str]) -> Result<PathBuf> {
        let path = self.data_dir.join(format!("{}.hmm", name));
        fs::write(
            &path,
            format!("HMMER3/f [3.3.2 | Nov 2020]\nNAME  {}\nLENG  {}\nHMM\n//\n", name, length),
        )?;
        let mut table = TBL_HEADER.to_string();
        for row in rows {
            table.push_str(row);
            table.push('\n');
        }
        fs::write(self.data_dir.join(format!("{}.hmm.tbl", name)), table)?;
        Ok(path)
    }

    pub fn write_input(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Config pointing every data file and tool into this environment
    pub fn write_config(&self, hmmsearch: &Path, blastp: &Path) -> Result<PathBuf> {
        let data = |name: &str| self.data_dir.join(name).display().to_string();
        let text = format!(
            r#"[triplication]
profile = "{glyx3}"

[glyzip]
profiles = ["{gly1}", "{gly2}", "{gly3}"]

[nter]
database = "{db}"
mapping = "{mapping}"

[tools]
hmmsearch = "{hmmsearch}"
blastp = "{blastp}"
"#,
            glyx3 = data("GlyX3.hmm"),
            gly1 = data("Gly1.hmm"),
            gly2 = data("Gly2.hmm"),
            gly3 = data("Gly3.hmm"),
            db = data("nterdb.fasta"),
            mapping = data("nterdb.tsv"),
            hmmsearch = hmmsearch.display(),
            blastp = blastp.display(),
        );
        let path = self.temp_dir.path().join("calfinder.toml");
        fs::write(&path, text)?;
        Ok(path)
    }

    /// Profiles and reference data for a single full-length calcyanin, seqA
    pub fn write_calcyanin_data(&self) -> Result<()> {
        self.write_profile(
            "GlyX3",
            100,
            &["seqA - 300 GlyX3 - 100 1e-40 150.0 1.0 1 1 1e-42 1e-39 140.0 1.0 1 90 150 290 148 292 0.95 -"],
        )?;
        self.write_profile(
            "Gly1",
            40,
            &["seqA - 300 Gly1 - 40 1e-10 40.0 0.1 1 1 1e-11 1e-9 38.0 0.1 1 40 150 189 150 189 0.9 -"],
        )?;
        self.write_profile(
            "Gly2",
            40,
            &["seqA - 300 Gly2 - 40 1e-9 38.0 0.1 1 1 1e-10 1e-8 36.0 0.1 1 40 195 234 195 234 0.9 -"],
        )?;
        self.write_profile(
            "Gly3",
            40,
            &["seqA - 300 Gly3 - 40 1e-8 35.0 0.1 1 1 1e-9 1e-7 33.0 0.1 1 40 240 279 240 279 0.9 -"],
        )?;
        fs::write(self.data_dir.join("nterdb.fasta"), ">ref2\nMKVLAAGG\n")?;
        fs::write(
            self.data_dir.join("nterdb.tsv"),
            "Y-type ref2 Gloeomargarita lithophora\n",
        )?;
        Ok(())
    }
}

/// Two-record protein FASTA; seqA is the calcyanin
pub fn calcyanin_fasta() -> String {
    format!(">seqA candidate\n{}\n>seqB other\n{}\n", "G".repeat(300), "A".repeat(120))
}

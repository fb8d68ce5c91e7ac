//! Configuration types for calfinder

use crate::system::paths::calfinder_data_dir;
use crate::CalfError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub triplication: TriplicationConfig,
    #[serde(default)]
    pub glyzip: GlyzipConfig,
    #[serde(default)]
    pub nter: NterConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Glycine triplication (GlyX3) detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriplicationConfig {
    /// GlyX3 profile, defaults to `<data dir>/GlyX3.hmm`
    #[serde(default)]
    pub profile: Option<PathBuf>,
    /// Full-sequence E-value a hit must beat to be called
    #[serde(default = "default_triplication_evalue")]
    pub evalue: f64,
    /// Per-domain independent E-value threshold for called hits
    #[serde(default = "default_triplication_i_evalue")]
    pub i_evalue: f64,
    /// Minimal profile coverage for a sequence to be a calcyanin candidate
    #[serde(default = "default_triplication_coverage")]
    pub coverage: f64,
}

/// Glycine zipper sub-domain annotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlyzipConfig {
    /// Gly1, Gly2 and Gly3 profiles, defaults to `<data dir>/Gly{1,2,3}.hmm`
    #[serde(default)]
    pub profiles: Vec<PathBuf>,
    #[serde(default = "default_glyzip_i_evalue")]
    pub i_evalue: f64,
    #[serde(default = "default_glyzip_evalue")]
    pub evalue: f64,
    /// Resolved intervals covering less of their profile are dropped
    #[serde(default = "default_glyzip_min_coverage")]
    pub min_coverage: f64,
}

/// N-terminal classification against the reference database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NterConfig {
    /// Reference FASTA, defaults to `<data dir>/nterdb.fasta`
    #[serde(default)]
    pub database: Option<PathBuf>,
    /// Subject id to N-ter type table, defaults to `<data dir>/nterdb.tsv`
    #[serde(default)]
    pub mapping: Option<PathBuf>,
    #[serde(default = "default_nter_evalue")]
    pub evalue: f64,
    /// Minimal subject coverage as a fraction
    #[serde(default = "default_nter_coverage")]
    pub coverage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Worker count handed to external tools (0 = all cores)
    #[serde(default)]
    pub threads: usize,
    /// Search space size used for domain E-values
    #[serde(default = "default_dom_z")]
    pub dom_z: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolsConfig {
    /// Explicit hmmsearch binary, otherwise looked up in PATH
    #[serde(default)]
    pub hmmsearch: Option<PathBuf>,
    /// Explicit blastp binary, otherwise looked up in PATH
    #[serde(default)]
    pub blastp: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Extension of input files when the input is a directory
    #[serde(default = "default_input_extension")]
    pub input_extension: String,
    /// Write per-stage tables under `intermediates/`
    #[serde(default = "default_write_intermediates")]
    pub write_intermediates: bool,
}

// Default value functions
fn default_triplication_evalue() -> f64 { 1e-30 }
fn default_triplication_i_evalue() -> f64 { 1.0 }
fn default_triplication_coverage() -> f64 { 0.62 }
fn default_glyzip_i_evalue() -> f64 { 3.6e-4 }
fn default_glyzip_evalue() -> f64 { 1.0 }
fn default_glyzip_min_coverage() -> f64 { 0.65 }
fn default_nter_evalue() -> f64 { 1e-7 }
fn default_nter_coverage() -> f64 { 0.80 }
fn default_dom_z() -> f64 { 10000.0 }
fn default_input_extension() -> String { "faa.gz".to_string() }
fn default_write_intermediates() -> bool { true }

impl Default for TriplicationConfig {
    fn default() -> Self {
        Self {
            profile: None,
            evalue: default_triplication_evalue(),
            i_evalue: default_triplication_i_evalue(),
            coverage: default_triplication_coverage(),
        }
    }
}

impl Default for GlyzipConfig {
    fn default() -> Self {
        Self {
            profiles: Vec::new(),
            i_evalue: default_glyzip_i_evalue(),
            evalue: default_glyzip_evalue(),
            min_coverage: default_glyzip_min_coverage(),
        }
    }
}

impl Default for NterConfig {
    fn default() -> Self {
        Self {
            database: None,
            mapping: None,
            evalue: default_nter_evalue(),
            coverage: default_nter_coverage(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            dom_z: default_dom_z(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            input_extension: default_input_extension(),
            write_intermediates: default_write_intermediates(),
        }
    }
}

impl TriplicationConfig {
    pub fn profile_path(&self) -> PathBuf {
        self.profile
            .clone()
            .unwrap_or_else(|| calfinder_data_dir().join("GlyX3.hmm"))
    }
}

impl GlyzipConfig {
    pub fn profile_paths(&self) -> Vec<PathBuf> {
        if self.profiles.is_empty() {
            let data = calfinder_data_dir();
            ["Gly1.hmm", "Gly2.hmm", "Gly3.hmm"]
                .iter()
                .map(|name| data.join(name))
                .collect()
        } else {
            self.profiles.clone()
        }
    }
}

impl NterConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| calfinder_data_dir().join("nterdb.fasta"))
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.mapping
            .clone()
            .unwrap_or_else(|| calfinder_data_dir().join("nterdb.tsv"))
    }
}

impl Config {
    /// Reject thresholds that cannot be meaningful
    pub fn validate(&self) -> Result<(), CalfError> {
        let fractions = [
            ("triplication.coverage", self.triplication.coverage),
            ("glyzip.min_coverage", self.glyzip.min_coverage),
            ("nter.coverage", self.nter.coverage),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(CalfError::Configuration(format!(
                    "{} must be a fraction between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        let evalues = [
            ("triplication.evalue", self.triplication.evalue),
            ("triplication.i_evalue", self.triplication.i_evalue),
            ("glyzip.evalue", self.glyzip.evalue),
            ("glyzip.i_evalue", self.glyzip.i_evalue),
            ("nter.evalue", self.nter.evalue),
        ];
        for (name, value) in evalues {
            if value.is_nan() || value < 0.0 {
                return Err(CalfError::Configuration(format!(
                    "{} must be a non-negative E-value, got {}",
                    name, value
                )));
            }
        }

        if self.search.dom_z <= 0.0 {
            return Err(CalfError::Configuration(format!(
                "search.dom_z must be positive, got {}",
                self.search.dom_z
            )));
        }

        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, CalfError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| CalfError::Configuration(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), CalfError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| CalfError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

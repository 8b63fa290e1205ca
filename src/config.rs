//! Benchmark configuration
//!
//! Values come from [`BenchConfig::default`], optionally overlaid by a JSON
//! file, then by command line flags in the binary.
//!
//! ```rust
//! use sales_serde_bench::config::BenchConfig;
//!
//! let config = BenchConfig {
//!     rows: 50,
//!     iterations: 5,
//!     ..Default::default()
//! };
//! config.validate()?;
//! # Ok::<(), sales_serde_bench::Error>(())
//! ```

use crate::bench::RunnerOptions;
use crate::codec::CodecKind;
use crate::dataset::constants::{DEFAULT_ROWS, DEFAULT_SEED};
use crate::dataset::{CsvDatasetProvider, DatasetProvider, SyntheticDatasetProvider};
use crate::error::{Error, ResourceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Report rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Console table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::configuration(format!(
                "unknown output format {other:?}, expected table or json"
            ))),
        }
    }
}

/// Benchmark run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// CSV dataset; `None` selects the synthetic provider
    pub dataset: Option<PathBuf>,
    /// Maximum number of records loaded
    pub rows: usize,
    /// Seed of the synthetic provider
    pub seed: u64,
    /// Directory holding the Avro schema documents
    pub schema_dir: PathBuf,
    /// Timed trials per triple
    pub iterations: usize,
    /// Untimed calls before the trials of each triple
    pub warmup_iterations: usize,
    /// Codecs to register, in report order
    pub codecs: Vec<CodecKind>,
    /// Report rendering on stdout
    pub output: OutputFormat,
    /// Optional file receiving the JSON report
    pub report_path: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            rows: DEFAULT_ROWS,
            seed: DEFAULT_SEED,
            schema_dir: PathBuf::from("schemas"),
            iterations: 100,
            warmup_iterations: 10,
            codecs: CodecKind::ALL.to_vec(),
            output: OutputFormat::Table,
            report_path: None,
        }
    }
}

impl BenchConfig {
    /// Read a JSON config file; absent fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ResourceError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ResourceError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::configuration(format!("invalid config file {}: {e}", path.display())))
    }

    /// Pretty JSON of the configuration
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(std::io::Error::from)?)
    }

    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::configuration("iterations must be at least 1"));
        }
        if self.codecs.is_empty() {
            return Err(Error::configuration("no codecs selected"));
        }
        let mut seen = BTreeSet::new();
        if let Some(duplicate) = self.codecs.iter().find(|kind| !seen.insert(**kind)) {
            return Err(Error::configuration(format!("codec {duplicate} selected twice")));
        }
        Ok(())
    }

    /// Trial counts for the runner
    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            iterations: self.iterations,
            warmup_iterations: self.warmup_iterations,
        }
    }

    /// CSV provider when a dataset path is set, synthetic otherwise
    pub fn dataset_provider(&self) -> Box<dyn DatasetProvider> {
        match &self.dataset {
            Some(path) => Box::new(CsvDatasetProvider::new(path.clone(), self.rows)),
            None => Box::new(SyntheticDatasetProvider::new(self.rows, self.seed)),
        }
    }
}

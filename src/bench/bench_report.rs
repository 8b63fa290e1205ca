//! Benchmark results and report rendering
//!
//! The report is a plain value built once at the end of a run. It is
//! serializable to JSON and renders as a console table through `Display`.

use super::bench_stats::Summary;
use super::Operation;
use crate::dataset::Shape;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// Aggregated measurements of one (codec, shape, operation) triple
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    /// Codec name
    pub codec: String,
    /// Dataset shape
    pub shape: Shape,
    /// Measured operation
    pub operation: Operation,
    /// Number of timed trials
    pub iterations: usize,
    /// Elapsed time per trial, in nanoseconds
    pub time_ns: Summary,
    /// Bytes allocated per trial
    pub allocated_bytes: Summary,
    /// Allocation calls per trial
    pub allocations: Summary,
    /// Encoded size of this shape, in bytes
    pub encoded_bytes: usize,
}

/// Encoded size of the dataset for one codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedSize {
    /// Codec name
    pub codec: &'static str,
    /// Bytes of the separate-items encoding
    pub separate: usize,
    /// Bytes of the single-object encoding
    pub single: usize,
    /// Adapter framing included in `separate`, beyond the format's own bytes
    pub framing: usize,
}

impl EncodedSize {
    /// Size of `shape`
    pub fn of(&self, shape: Shape) -> usize {
        match shape {
            Shape::Separate => self.separate,
            Shape::Single => self.single,
        }
    }

    /// Separate-items size without adapter framing
    pub fn separate_payload(&self) -> usize {
        self.separate - self.framing
    }
}

/// A codec error raised on the timed path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialFailure {
    /// Codec name
    pub codec: String,
    /// Dataset shape
    pub shape: Shape,
    /// Operation that failed
    pub operation: Operation,
    /// Trials completed before the failure
    pub completed: usize,
    /// Codec error message
    pub error: String,
}

/// Full outcome of a benchmark run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    /// Unique run identifier
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Records in the dataset
    pub records: usize,
    /// Timed trials per triple
    pub iterations: usize,
    /// Untimed calls per triple
    pub warmup_iterations: usize,
    /// Encoded sizes per codec, in registration order
    pub sizes: Vec<EncodedSize>,
    /// Results per triple
    pub results: Vec<BenchmarkResult>,
    /// Codecs whose trials stopped early
    pub failures: Vec<TrialFailure>,
}

impl BenchmarkReport {
    /// Result of one triple
    pub fn result(&self, codec: &str, shape: Shape, operation: Operation) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .find(|r| r.codec == codec && r.shape == shape && r.operation == operation)
    }

    /// Encoded sizes of one codec
    pub fn size(&self, codec: &str) -> Option<&EncodedSize> {
        self.sizes.iter().find(|s| s.codec == codec)
    }

    /// Pretty-printed JSON rendering
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(std::io::Error::from)?)
    }

    /// Write the JSON rendering to `path`
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn micros(nanos: f64) -> f64 {
    nanos / 1_000.0
}

fn kilobytes(bytes: f64) -> f64 {
    bytes / 1024.0
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "run {} at {}: {} records, {} iterations ({} warm-up)",
            self.run_id,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.records,
            self.iterations,
            self.warmup_iterations
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<12} {:<12} {:<9} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "codec", "operation", "shape", "mean µs", "stddev µs", "median µs", "alloc KB", "size KB"
        )?;
        for result in &self.results {
            writeln!(
                f,
                "{:<12} {:<12} {:<9} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
                result.codec,
                result.operation,
                result.shape,
                micros(result.time_ns.mean),
                micros(result.time_ns.std_dev),
                micros(result.time_ns.median),
                kilobytes(result.allocated_bytes.mean),
                kilobytes(result.encoded_bytes as f64),
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:<12} {:>16} {:>16} {:>16}",
            "codec", "separate bytes", "of which framing", "single bytes"
        )?;
        for size in &self.sizes {
            writeln!(
                f,
                "{:<12} {:>16} {:>16} {:>16}",
                size.codec, size.separate, size.framing, size.single
            )?;
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "failures:")?;
            for failure in &self.failures {
                writeln!(
                    f,
                    "  {} {} ({}) after {} trials: {}",
                    failure.codec, failure.operation, failure.shape, failure.completed, failure.error
                )?;
            }
        }
        Ok(())
    }
}

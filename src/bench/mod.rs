//! Benchmark runner, measurement and reporting
//!
//! The runner drives every registered codec through setup, round-trip
//! validation and timed trials for each (shape, operation) pair, then
//! aggregates the samples into a [`BenchmarkReport`]. It only depends on the
//! [`Codec`](crate::codec::Codec) operations, so new formats and new record
//! schemas need no changes here.

pub mod bench_alloc;
pub mod bench_report;
pub mod bench_runner;
pub mod bench_stats;

pub use bench_alloc::{AllocationSnapshot, CountingAllocator};
pub use bench_report::{BenchmarkReport, BenchmarkResult, EncodedSize, TrialFailure};
pub use bench_runner::{BenchmarkRunner, RunnerOptions, RunnerState};
pub use bench_stats::Summary;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measured codec operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Records to bytes
    Serialize,
    /// Bytes to records
    Deserialize,
}

impl Operation {
    /// Both operations, in report order
    pub const ALL: [Operation; 2] = [Operation::Serialize, Operation::Deserialize];

    /// Lowercase name used in logs and reports
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Serialize => "serialize",
            Operation::Deserialize => "deserialize",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

//! # Sales Serde Bench
//!
//! A pluggable harness that measures how fast, how compact and how
//! allocation-heavy several serialization formats are on a fixed dataset of
//! sales records, after checking that every format reproduces the data
//! exactly.
//!
//! ## Modules
//!
//! - **Model**: the `SalesItem` record, its container, and the explicit field
//!   mapping shared by every format
//! - **Dataset**: CSV and synthetic providers, and the two dataset shapes
//!   (separate items and single object)
//! - **Codec**: one adapter per format (JSON, SIMD JSON, BSON, two Avro
//!   implementations, Protobuf, bincode) behind a common trait
//! - **Validation**: round-trip correctness gate
//! - **Bench**: runner state machine, timing, allocation accounting and reports
//!
//! ## Example
//!
//! ```rust
//! use sales_serde_bench::prelude::*;
//!
//! let dataset = Dataset::load(&SyntheticDatasetProvider::new(20, 42))?;
//! let codec = JsonCodec::new();
//! assert!(RoundTripValidator::validate(&codec, &dataset));
//!
//! let mut runner = BenchmarkRunner::<SalesItemContainer>::new(RunnerOptions { iterations: 2, warmup_iterations: 0 });
//! runner.register(Box::new(codec));
//! let report = runner.run(&dataset)?;
//! assert_eq!(report.results.len(), 4);
//! # Ok::<(), sales_serde_bench::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{Error, Result};

// Core modules
pub mod bench;
pub mod codec;
pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod validation;

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    pub use crate::bench::{BenchmarkReport, BenchmarkRunner, RunnerOptions, RunnerState};
    pub use crate::codec::{Codec, CodecKind, DatasetCodec, JsonCodec, NamedCodec};
    pub use crate::config::BenchConfig;
    pub use crate::dataset::{Dataset, DatasetProvider, Shape, SyntheticDatasetProvider};
    pub use crate::error::{CodecError, Error, Result, ValidationError};
    pub use crate::model::{Container, Record, SalesItem, SalesItemContainer};
    pub use crate::validation::RoundTripValidator;
}

// Version information
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

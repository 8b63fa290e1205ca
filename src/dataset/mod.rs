//! Dataset providers and the fixed benchmark dataset
//!
//! A [`Dataset`] is produced once per run and used identically by every codec.
//! It stores a single container; the separate-items shape borrows the
//! container's items, so both shapes always hold the same records in the
//! same order.

pub mod dataset_csv;
pub mod dataset_synthetic;

pub use dataset_csv::CsvDatasetProvider;
pub use dataset_synthetic::SyntheticDatasetProvider;

use crate::error::Result;
use crate::model::{Container, SalesItem, SalesItemContainer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dataset constants
pub mod constants {
    //! Defaults shared by the providers

    /// Default number of records loaded per run
    pub const DEFAULT_ROWS: usize = 1000;

    /// Default seed of the synthetic provider
    pub const DEFAULT_SEED: u64 = 42;
}

/// The two ways a dataset is presented to a codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Each record encoded as its own unit
    Separate,
    /// All records wrapped in one container
    Single,
}

impl Shape {
    /// Both shapes, in report order
    pub const ALL: [Shape; 2] = [Shape::Separate, Shape::Single];

    /// Lowercase name used in logs and reports
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Separate => "separate",
            Shape::Single => "single",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Source of sales records
pub trait DatasetProvider {
    /// Produce the records, in source order
    fn get_data(&self) -> Result<Vec<SalesItem>>;
}

/// The fixed collection of records under benchmark
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<C: Container> {
    container: C,
}

impl<C: Container> Dataset<C> {
    /// Build a dataset from records in order
    pub fn from_records(records: Vec<C::Item>) -> Self {
        Self {
            container: C::from_items(records),
        }
    }

    /// Separate-items shape: every record as its own unit
    pub fn separate(&self) -> &[C::Item] {
        self.container.items()
    }

    /// Single-object shape: all records wrapped in one container
    pub fn single(&self) -> &C {
        &self.container
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.container.items().len()
    }

    /// True when the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Dataset<SalesItemContainer> {
    /// Load the dataset from a provider
    pub fn load(provider: &dyn DatasetProvider) -> Result<Self> {
        let records = provider.get_data()?;
        tracing::info!(records = records.len(), "dataset loaded");
        Ok(Self::from_records(records))
    }
}

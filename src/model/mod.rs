//! Record model shared by every codec under test
//!
//! The harness is generic over [`Record`] and [`Container`]: a codec adapter
//! only needs to encode values of these traits, and the runner only needs a
//! container type whose items form the separate-items shape.

pub mod model_fields;
pub mod model_sales;

pub use model_fields::{FieldSpec, WireKind};
pub use model_sales::{SalesItem, SalesItemContainer};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Whether a record type is a single item or an aggregate of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// One independent record
    Item,
    /// A container wrapping a sequence of items
    Container,
}

/// A plain data type that every codec can encode
pub trait Record: Serialize + DeserializeOwned + Clone + PartialEq + Debug + 'static {
    /// Item or container
    const KIND: RecordKind;

    /// Wire name of the record type (schema record name)
    const NAME: &'static str;

    /// Explicit field mapping, in declaration order
    const FIELDS: &'static [FieldSpec];
}

/// A record that wraps an ordered sequence of item records
pub trait Container: Record {
    /// The wrapped item type
    type Item: Record;

    /// Wrap `items`, preserving their order
    fn from_items(items: Vec<Self::Item>) -> Self;

    /// Borrow the wrapped items
    fn items(&self) -> &[Self::Item];
}

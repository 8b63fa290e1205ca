//! Codec adapters
//!
//! This module defines the uniform interface every wire format implements and
//! one adapter per format:
//! - **JSON** via `serde_json` and via `sonic-rs`
//! - **BSON** via `bson`
//! - **Avro** via `apache-avro` and via `serde_avro_fast`
//! - **Protobuf** via `prost`
//! - **bincode** via `bincode`
//!
//! Adapters own their per-format state (parsed schemas, message mappings) and
//! are immutable after construction. The runner and validator only see the
//! [`Codec`] operations, so a new format plugs in by implementing [`Codec`]
//! for the item and container types and adding a [`CodecKind`].

pub mod codec_avro_apache;
pub mod codec_avro_fast;
pub mod codec_bincode;
pub mod codec_bson;
pub mod codec_framing;
pub mod codec_json;
pub mod codec_protobuf;
pub mod codec_schema;
pub mod codec_sonic;

pub use codec_avro_apache::AvroApacheCodec;
pub use codec_avro_fast::AvroFastCodec;
pub use codec_bincode::BincodeCodec;
pub use codec_bson::BsonCodec;
pub use codec_json::JsonCodec;
pub use codec_protobuf::{ProtoMapped, ProtobufCodec};
pub use codec_schema::SchemaDocuments;
pub use codec_sonic::SonicJsonCodec;

use crate::error::{CodecResult, Error, Result};
use crate::model::{Container, SalesItemContainer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Encoding and decoding of one record type
pub trait Codec<T> {
    /// Encode one value
    fn serialize_one(&self, value: &T) -> CodecResult<Vec<u8>>;

    /// Encode each value as a self-delimiting unit, concatenated in order
    fn serialize_many(&self, values: &[T]) -> CodecResult<Vec<u8>>;

    /// Decode one value; truncated or malformed input is an error
    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<T>;

    /// Decode a buffer produced by [`Codec::serialize_many`], consuming all of it
    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<T>>;
}

/// A codec with a display name
pub trait NamedCodec {
    /// Name used in logs, errors and reports
    fn name(&self) -> &'static str;

    /// Length prefix the adapter writes before each separate item when the
    /// format cannot delimit consecutive values itself
    fn frame_prefix_bytes(&self) -> usize {
        0
    }
}

/// Everything the runner needs to benchmark a dataset of container `C`
pub trait DatasetCodec<C: Container>: NamedCodec + Codec<C::Item> + Codec<C> {}

impl<C, X> DatasetCodec<C> for X
where
    C: Container,
    X: NamedCodec + Codec<C::Item> + Codec<C>,
{
}

/// Registered codec implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodecKind {
    /// `serde_json`
    Json,
    /// `sonic-rs`
    SonicJson,
    /// `bson`
    Bson,
    /// `apache-avro`
    AvroApache,
    /// `serde_avro_fast`
    AvroFast,
    /// `prost`
    Protobuf,
    /// `bincode`
    Bincode,
}

impl CodecKind {
    /// Every codec, in report order
    pub const ALL: [CodecKind; 7] = [
        CodecKind::Json,
        CodecKind::SonicJson,
        CodecKind::Bson,
        CodecKind::AvroApache,
        CodecKind::AvroFast,
        CodecKind::Protobuf,
        CodecKind::Bincode,
    ];

    /// Stable name, identical to the adapter's [`NamedCodec::name`]
    pub fn name(self) -> &'static str {
        match self {
            CodecKind::Json => codec_json::NAME,
            CodecKind::SonicJson => codec_sonic::NAME,
            CodecKind::Bson => codec_bson::NAME,
            CodecKind::AvroApache => codec_avro_apache::NAME,
            CodecKind::AvroFast => codec_avro_fast::NAME,
            CodecKind::Protobuf => codec_protobuf::NAME,
            CodecKind::Bincode => codec_bincode::NAME,
        }
    }

    /// True for codecs that read schema documents at construction
    pub fn needs_schema(self) -> bool {
        matches!(self, CodecKind::AvroApache | CodecKind::AvroFast)
    }

    /// Construct the adapter; Avro adapters load their schemas from `schema_dir`
    pub fn build(self, schema_dir: &Path) -> Result<Box<dyn DatasetCodec<SalesItemContainer>>> {
        let codec: Box<dyn DatasetCodec<SalesItemContainer>> = match self {
            CodecKind::Json => Box::new(JsonCodec::new()),
            CodecKind::SonicJson => Box::new(SonicJsonCodec::new()),
            CodecKind::Bson => Box::new(BsonCodec::new()),
            CodecKind::AvroApache => {
                let documents = SchemaDocuments::load(schema_dir)?;
                Box::new(AvroApacheCodec::from_documents::<SalesItemContainer>(&documents)?)
            }
            CodecKind::AvroFast => {
                let documents = SchemaDocuments::load(schema_dir)?;
                Box::new(AvroFastCodec::from_documents::<SalesItemContainer>(&documents)?)
            }
            CodecKind::Protobuf => Box::new(ProtobufCodec::new()),
            CodecKind::Bincode => Box::new(BincodeCodec::new()),
        };
        Ok(codec)
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodecKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CodecKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = CodecKind::ALL.iter().map(|k| k.name()).collect();
                Error::configuration(format!("unknown codec {s:?}, expected one of {}", known.join(", ")))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_kind_names_round_trip() {
        for kind in CodecKind::ALL {
            assert_eq!(kind.name().parse::<CodecKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
        assert!("msgpack".parse::<CodecKind>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        for kind in CodecKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_build_reports_matching_name() {
        let schema_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas");
        for kind in CodecKind::ALL {
            let codec = kind.build(&schema_dir).unwrap();
            assert_eq!(codec.name(), kind.name());
        }
    }

    #[test]
    fn test_missing_schema_dir_fails_for_avro_only() {
        let schema_dir = Path::new("no/such/schemas");
        for kind in CodecKind::ALL {
            assert_eq!(kind.build(schema_dir).is_err(), kind.needs_schema(), "{kind}");
        }
    }
}

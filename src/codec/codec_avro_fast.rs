//! Avro codec backed by `serde_avro_fast`
//!
//! An independent Avro implementation that serializes straight from serde
//! without an intermediate value tree. Its datum reader does not report how
//! much input it consumed, so the separate-items shape frames every datum
//! with a u32 length prefix. Reports list those prefix bytes separately so
//! the separate size still compares with plain concatenated Avro datums.

use super::codec_framing::{write_length_prefixed, LengthPrefixedUnits, LENGTH_PREFIX_SIZE};
use super::codec_schema::SchemaDocuments;
use super::{Codec, NamedCodec};
use crate::error::{CodecError, CodecResult};
use crate::model::{Container, Record, RecordKind};
use serde_avro_fast::ser::SerializerConfig;
use serde_avro_fast::Schema;

/// Codec name
pub const NAME: &str = "avro-fast";

/// `serde_avro_fast` adapter holding the parsed item and container schemas
pub struct AvroFastCodec {
    item_schema: Schema,
    container_schema: Schema,
}

impl AvroFastCodec {
    /// Check and parse the schema documents for container `C`
    pub fn from_documents<C: Container>(documents: &SchemaDocuments) -> CodecResult<Self> {
        documents.check::<C>(NAME)?;
        Ok(Self {
            item_schema: parse_schema(&documents.item)?,
            container_schema: parse_schema(&documents.container)?,
        })
    }

    fn schema<T: Record>(&self) -> &Schema {
        match T::KIND {
            RecordKind::Item => &self.item_schema,
            RecordKind::Container => &self.container_schema,
        }
    }
}

fn parse_schema(document: &str) -> CodecResult<Schema> {
    document.parse::<Schema>().map_err(|e| CodecError::schema(NAME, e))
}

impl NamedCodec for AvroFastCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn frame_prefix_bytes(&self) -> usize {
        LENGTH_PREFIX_SIZE
    }
}

impl<T: Record> Codec<T> for AvroFastCodec {
    fn serialize_one(&self, value: &T) -> CodecResult<Vec<u8>> {
        let mut config = SerializerConfig::new(self.schema::<T>());
        serde_avro_fast::to_datum(value, Vec::new(), &mut config).map_err(|e| CodecError::encode(NAME, e))
    }

    fn serialize_many(&self, values: &[T]) -> CodecResult<Vec<u8>> {
        let mut config = SerializerConfig::new(self.schema::<T>());
        let mut buffer = Vec::new();
        let mut datum = Vec::new();
        for value in values {
            datum.clear();
            datum = serde_avro_fast::to_datum(value, datum, &mut config).map_err(|e| CodecError::encode(NAME, e))?;
            write_length_prefixed(&mut buffer, &datum, NAME)?;
        }
        Ok(buffer)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<T> {
        serde_avro_fast::from_datum_slice(bytes, self.schema::<T>()).map_err(|e| CodecError::decode(NAME, e))
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<T>> {
        LengthPrefixedUnits::new(bytes, NAME)
            .map(|unit| Codec::<T>::deserialize_one(self, unit?))
            .collect()
    }
}

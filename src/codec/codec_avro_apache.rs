//! Avro codec backed by `apache-avro`
//!
//! Values go through the library's `Value` model and are written as raw
//! datums (no object container file). The datum reader consumes exactly one
//! datum from a byte slice, so the separate-items shape is plain
//! concatenation.

use super::codec_schema::SchemaDocuments;
use super::{Codec, NamedCodec};
use crate::error::{CodecError, CodecResult};
use crate::model::{Container, Record, RecordKind};
use apache_avro::Schema;

/// Codec name
pub const NAME: &str = "avro-apache";

/// `apache-avro` adapter holding the parsed item and container schemas
#[derive(Debug, Clone)]
pub struct AvroApacheCodec {
    item_schema: Schema,
    container_schema: Schema,
}

impl AvroApacheCodec {
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

    fn encode_datum<T: Record>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let value = apache_avro::to_value(value).map_err(|e| CodecError::encode(NAME, e))?;
        apache_avro::to_avro_datum(self.schema::<T>(), value).map_err(|e| CodecError::encode(NAME, e))
    }

    fn decode_datum<T: Record>(&self, reader: &mut &[u8]) -> CodecResult<T> {
        let value = apache_avro::from_avro_datum(self.schema::<T>(), reader, None)
            .map_err(|e| CodecError::decode(NAME, e))?;
        apache_avro::from_value(&value).map_err(|e| CodecError::decode(NAME, e))
    }
}

fn parse_schema(document: &str) -> CodecResult<Schema> {
    Schema::parse_str(document).map_err(|e| CodecError::schema(NAME, e))
}

impl NamedCodec for AvroApacheCodec {
    fn name(&self) -> &'static str {
        NAME
    }
}

impl<T: Record> Codec<T> for AvroApacheCodec {
    fn serialize_one(&self, value: &T) -> CodecResult<Vec<u8>> {
        self.encode_datum(value)
    }

    fn serialize_many(&self, values: &[T]) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        for value in values {
            buffer.extend_from_slice(&self.encode_datum(value)?);
        }
        Ok(buffer)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<T> {
        let mut reader = bytes;
        let value = self.decode_datum(&mut reader)?;
        if !reader.is_empty() {
            return Err(CodecError::decode(NAME, format!("{} trailing bytes after datum", reader.len())));
        }
        Ok(value)
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<T>> {
        let mut items = Vec::new();
        let mut reader = bytes;
        while !reader.is_empty() {
            items.push(self.decode_datum(&mut reader)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SalesItem, SalesItemContainer};
    use std::path::Path;

    fn codec() -> AvroApacheCodec {
        let documents = SchemaDocuments::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas")).unwrap();
        AvroApacheCodec::from_documents::<SalesItemContainer>(&documents).unwrap()
    }

    #[test]
    fn test_mismatched_schema_is_schema_error() {
        let documents = SchemaDocuments::new(
            r#"{"type": "record", "name": "SalesItem", "fields": []}"#,
            r#"{"type": "record", "name": "SalesItemContainer", "fields": []}"#,
        );
        let error = AvroApacheCodec::from_documents::<SalesItemContainer>(&documents).unwrap_err();
        assert!(matches!(error, CodecError::Schema { .. }));
    }

    #[test]
    fn test_datums_are_concatenated_without_framing() {
        let codec = codec();
        let item = SalesItem {
            region: "Europe".to_string(),
            order_id: 7,
            ..SalesItem::default()
        };
        let one = Codec::<SalesItem>::serialize_one(&codec, &item).unwrap();
        let many = Codec::<SalesItem>::serialize_many(&codec, &[item.clone(), item]).unwrap();
        assert_eq!(many.len(), 2 * one.len());
        assert_eq!(&many[..one.len()], one.as_slice());
    }
}

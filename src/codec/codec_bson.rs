//! BSON codec backed by `bson`
//!
//! A BSON document starts with its own little-endian i32 length, so the
//! separate-items shape is plain concatenation of documents.

use super::{Codec, NamedCodec};
use crate::error::{CodecError, CodecResult};
use crate::model::Record;
use byteorder::{ByteOrder, LittleEndian};

/// Codec name
pub const NAME: &str = "bson";

// i32 length + terminating NUL
const MIN_DOCUMENT_SIZE: usize = 5;

/// `bson` adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct BsonCodec;

impl BsonCodec {
    /// Create the adapter
    pub fn new() -> Self {
        Self
    }
}

impl NamedCodec for BsonCodec {
    fn name(&self) -> &'static str {
        NAME
    }
}

/// Length of the document at the start of `bytes`, checked against the buffer
fn document_length(bytes: &[u8]) -> CodecResult<usize> {
    if bytes.len() < MIN_DOCUMENT_SIZE {
        return Err(CodecError::decode(NAME, format!("truncated document header ({} bytes)", bytes.len())));
    }

    let declared = LittleEndian::read_i32(&bytes[..4]);
    let length = usize::try_from(declared)
        .ok()
        .filter(|length| *length >= MIN_DOCUMENT_SIZE)
        .ok_or_else(|| CodecError::decode(NAME, format!("invalid document length {declared}")))?;

    if length > bytes.len() {
        return Err(CodecError::decode(
            NAME,
            format!("truncated document: expected {length} bytes, {} left", bytes.len()),
        ));
    }
    Ok(length)
}

impl<T: Record> Codec<T> for BsonCodec {
    fn serialize_one(&self, value: &T) -> CodecResult<Vec<u8>> {
        bson::to_vec(value).map_err(|e| CodecError::encode(NAME, e))
    }

    fn serialize_many(&self, values: &[T]) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        for value in values {
            let document = bson::to_vec(value).map_err(|e| CodecError::encode(NAME, e))?;
            buffer.extend_from_slice(&document);
        }
        Ok(buffer)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<T> {
        let length = document_length(bytes)?;
        if length != bytes.len() {
            return Err(CodecError::decode(
                NAME,
                format!("{} trailing bytes after document", bytes.len() - length),
            ));
        }
        bson::from_slice(bytes).map_err(|e| CodecError::decode(NAME, e))
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<T>> {
        let mut items = Vec::new();
        let mut rest = bytes;
        while !rest.is_empty() {
            let (document, tail) = rest.split_at(document_length(rest)?);
            items.push(bson::from_slice(document).map_err(|e| CodecError::decode(NAME, e))?);
            rest = tail;
        }
        Ok(items)
    }
}

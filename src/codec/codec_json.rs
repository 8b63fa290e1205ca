//! JSON codec backed by `serde_json`
//!
//! The separate-items shape is JSON Lines: one compact document per record,
//! each terminated by `\n`. Compact output never contains a raw newline, so
//! the terminator is an unambiguous frame boundary.

use super::codec_framing::line_body;
use super::{Codec, NamedCodec};
use crate::error::{CodecError, CodecResult};
use crate::model::Record;

/// Codec name
pub const NAME: &str = "json";

/// `serde_json` adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create the adapter
    pub fn new() -> Self {
        Self
    }
}

impl NamedCodec for JsonCodec {
    fn name(&self) -> &'static str {
        NAME
    }
}

impl<T: Record> Codec<T> for JsonCodec {
    fn serialize_one(&self, value: &T) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CodecError::encode(NAME, e))
    }

    fn serialize_many(&self, values: &[T]) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        for value in values {
            serde_json::to_writer(&mut buffer, value).map_err(|e| CodecError::encode(NAME, e))?;
            buffer.push(b'\n');
        }
        Ok(buffer)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::decode(NAME, e))
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<T>> {
        let Some(body) = line_body(bytes, NAME)? else {
            return Ok(Vec::new());
        };
        body.split(|byte| *byte == b'\n')
            .map(|line| serde_json::from_slice(line).map_err(|e| CodecError::decode(NAME, e)))
            .collect()
    }
}

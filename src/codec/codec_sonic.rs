//! JSON codec backed by `sonic-rs`
//!
//! Same JSON Lines framing as the `serde_json` adapter, so the two JSON
//! libraries are compared on identical bytes.

use super::codec_framing::line_body;
use super::{Codec, NamedCodec};
use crate::error::{CodecError, CodecResult};
use crate::model::Record;

/// Codec name
pub const NAME: &str = "sonic-json";

/// `sonic-rs` adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct SonicJsonCodec;

impl SonicJsonCodec {
    /// Create the adapter
    pub fn new() -> Self {
        Self
    }
}

impl NamedCodec for SonicJsonCodec {
    fn name(&self) -> &'static str {
        NAME
    }
}

impl<T: Record> Codec<T> for SonicJsonCodec {
    fn serialize_one(&self, value: &T) -> CodecResult<Vec<u8>> {
        sonic_rs::to_vec(value).map_err(|e| CodecError::encode(NAME, e))
    }

    fn serialize_many(&self, values: &[T]) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        for value in values {
            let line = sonic_rs::to_vec(value).map_err(|e| CodecError::encode(NAME, e))?;
            buffer.extend_from_slice(&line);
            buffer.push(b'\n');
        }
        Ok(buffer)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<T> {
        sonic_rs::from_slice(bytes).map_err(|e| CodecError::decode(NAME, e))
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<T>> {
        let Some(body) = line_body(bytes, NAME)? else {
            return Ok(Vec::new());
        };
        body.split(|byte| *byte == b'\n')
            .map(|line| sonic_rs::from_slice(line).map_err(|e| CodecError::decode(NAME, e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::model::SalesItem;

    #[test]
    fn test_reads_serde_json_output() {
        let item = SalesItem {
            region: "Asia".to_string(),
            order_id: 42,
            unit_price: 9.33,
            ..SalesItem::default()
        };
        let bytes = Codec::<SalesItem>::serialize_one(&JsonCodec, &item).unwrap();
        let decoded: SalesItem = SonicJsonCodec.deserialize_one(&bytes).unwrap();
        assert_eq!(decoded, item);
    }
}

//! bincode codec backed by `bincode` 2 serde support
//!
//! Uses the standard configuration (little endian, varint integers). A
//! decode reports how many bytes it consumed, so the separate-items shape is
//! plain concatenation.

use super::{Codec, NamedCodec};
use crate::error::{CodecError, CodecResult};
use crate::model::Record;
use bincode::config::{self, Configuration};

/// Codec name
pub const NAME: &str = "bincode";

/// `bincode` adapter
#[derive(Clone, Copy)]
pub struct BincodeCodec {
    config: Configuration,
}

// `Configuration`'s derived `Debug` needs its marker types to be `Debug`, which they are not
impl std::fmt::Debug for BincodeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BincodeCodec").finish_non_exhaustive()
    }
}

impl BincodeCodec {
    /// Create the adapter with the standard configuration
    pub fn new() -> Self {
        Self {
            config: config::standard(),
        }
    }

    fn decode_prefix<T: Record>(&self, bytes: &[u8]) -> CodecResult<(T, usize)> {
        bincode::serde::decode_from_slice(bytes, self.config).map_err(|e| CodecError::decode(NAME, e))
    }
}

impl Default for BincodeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl NamedCodec for BincodeCodec {
    fn name(&self) -> &'static str {
        NAME
    }
}

impl<T: Record> Codec<T> for BincodeCodec {
    fn serialize_one(&self, value: &T) -> CodecResult<Vec<u8>> {
        bincode::serde::encode_to_vec(value, self.config).map_err(|e| CodecError::encode(NAME, e))
    }

    fn serialize_many(&self, values: &[T]) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        for value in values {
            let unit = bincode::serde::encode_to_vec(value, self.config).map_err(|e| CodecError::encode(NAME, e))?;
            buffer.extend_from_slice(&unit);
        }
        Ok(buffer)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<T> {
        let (value, consumed) = self.decode_prefix(bytes)?;
        if consumed != bytes.len() {
            return Err(CodecError::decode(
                NAME,
                format!("{} trailing bytes after value", bytes.len() - consumed),
            ));
        }
        Ok(value)
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<T>> {
        let mut items = Vec::new();
        let mut rest = bytes;
        while !rest.is_empty() {
            let (value, consumed) = self.decode_prefix(rest)?;
            items.push(value);
            rest = &rest[consumed..];
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SalesItem;

    #[test]
    fn test_varint_integers() {
        let small = SalesItem {
            order_id: 1,
            ..SalesItem::default()
        };
        let large = SalesItem {
            order_id: i32::MAX,
            ..SalesItem::default()
        };
        let codec = BincodeCodec::new();
        let small_bytes = Codec::<SalesItem>::serialize_one(&codec, &small).unwrap();
        let large_bytes = Codec::<SalesItem>::serialize_one(&codec, &large).unwrap();
        assert!(small_bytes.len() < large_bytes.len());
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let codec = BincodeCodec::new();
        let mut bytes = Codec::<SalesItem>::serialize_one(&codec, &SalesItem::default()).unwrap();
        bytes.push(0);
        let result: CodecResult<SalesItem> = codec.deserialize_one(&bytes);
        assert!(result.unwrap_err().is_decode());
    }
}

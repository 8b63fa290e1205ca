//! Framing helpers for the separate-items shape
//!
//! Formats whose encoding is not self-delimiting wrap every unit in a frame
//! so that a concatenated buffer can be split again without outside length
//! information.

use crate::error::{CodecError, CodecResult};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

/// Size of a length prefix
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Append `unit` preceded by its length as a little-endian u32
pub fn write_length_prefixed(buffer: &mut Vec<u8>, unit: &[u8], codec: &str) -> CodecResult<()> {
    let length = u32::try_from(unit.len())
        .map_err(|_| CodecError::encode(codec, format!("unit of {} bytes exceeds frame limit", unit.len())))?;
    buffer
        .write_u32::<LittleEndian>(length)
        .map_err(|e| CodecError::encode(codec, e))?;
    buffer.extend_from_slice(unit);
    Ok(())
}

/// Iterator over the units of a length-prefixed buffer
///
/// Yields an error and stops when a prefix or unit is cut short.
pub struct LengthPrefixedUnits<'a> {
    rest: &'a [u8],
    codec: &'a str,
}

impl<'a> LengthPrefixedUnits<'a> {
    /// Split `bytes` into frames
    pub fn new(bytes: &'a [u8], codec: &'a str) -> Self {
        Self { rest: bytes, codec }
    }

    fn truncated(&mut self, reason: String) -> Option<CodecResult<&'a [u8]>> {
        self.rest = &[];
        Some(Err(CodecError::decode(self.codec, reason)))
    }
}

impl<'a> Iterator for LengthPrefixedUnits<'a> {
    type Item = CodecResult<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        if self.rest.len() < LENGTH_PREFIX_SIZE {
            return self.truncated(format!("truncated length prefix ({} bytes)", self.rest.len()));
        }

        let length = LittleEndian::read_u32(&self.rest[..LENGTH_PREFIX_SIZE]) as usize;
        let body = &self.rest[LENGTH_PREFIX_SIZE..];
        if body.len() < length {
            return self.truncated(format!("truncated unit: expected {length} bytes, {} left", body.len()));
        }

        let (unit, rest) = body.split_at(length);
        self.rest = rest;
        Some(Ok(unit))
    }
}

/// Body of a newline-terminated buffer, without its final `\n`
///
/// Returns `None` for an empty buffer. A buffer not ending in `\n` carries a
/// partial trailing unit and is rejected.
pub fn line_body<'a>(bytes: &'a [u8], codec: &str) -> CodecResult<Option<&'a [u8]>> {
    match bytes.split_last() {
        None => Ok(None),
        Some((b'\n', body)) => Ok(Some(body)),
        Some(_) => Err(CodecError::decode(codec, "trailing partial unit (missing line terminator)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_prefixed_units() {
        let mut buffer = Vec::new();
        write_length_prefixed(&mut buffer, b"abc", "test").unwrap();
        write_length_prefixed(&mut buffer, b"", "test").unwrap();
        write_length_prefixed(&mut buffer, b"de", "test").unwrap();
        assert_eq!(&buffer[..4], &[3, 0, 0, 0]);

        let units: Vec<&[u8]> = LengthPrefixedUnits::new(&buffer, "test")
            .collect::<CodecResult<_>>()
            .unwrap();
        assert_eq!(units, vec![&b"abc"[..], &b""[..], &b"de"[..]]);
    }

    #[test]
    fn test_truncated_frames_are_rejected() {
        let mut buffer = Vec::new();
        write_length_prefixed(&mut buffer, b"abcdef", "test").unwrap();

        for cut in [2, 4, 7] {
            let results: Vec<_> = LengthPrefixedUnits::new(&buffer[..cut], "test").collect();
            assert_eq!(results.len(), 1);
            assert!(results[0].as_ref().unwrap_err().is_decode());
        }
    }

    #[test]
    fn test_line_body() {
        assert_eq!(line_body(b"", "json").unwrap(), None);
        assert_eq!(line_body(b"{}\n{}\n", "json").unwrap(), Some(&b"{}\n{}"[..]));
        assert!(line_body(b"{}\n{", "json").is_err());
    }
}

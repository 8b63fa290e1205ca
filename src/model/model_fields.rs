//! Explicit field-to-wire mapping
//!
//! Every codec that needs positional or tagged encoding reads the mapping
//! from these tables instead of deriving it from the type at call time.

/// Wire-level kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// UTF-8 text
    String,
    /// Signed 64-bit milliseconds since the Unix epoch, UTC
    TimestampMillis,
    /// Signed 32-bit integer
    Int,
    /// IEEE 754 double
    Double,
    /// Ordered sequence of nested item records
    RecordArray,
}

impl WireKind {
    /// Avro primitive type name carrying this kind, `None` for complex kinds
    pub fn avro_primitive(self) -> Option<&'static str> {
        match self {
            WireKind::String => Some("string"),
            WireKind::TimestampMillis => Some("long"),
            WireKind::Int => Some("int"),
            WireKind::Double => Some("double"),
            WireKind::RecordArray => None,
        }
    }
}

/// Mapping of one record field onto the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name
    pub name: &'static str,
    /// Name used by text formats and schema documents
    pub wire_name: &'static str,
    /// Protobuf field tag
    pub tag: u32,
    /// Wire kind
    pub kind: WireKind,
}

impl FieldSpec {
    /// Declare a field mapping
    pub const fn new(name: &'static str, wire_name: &'static str, tag: u32, kind: WireKind) -> Self {
        Self {
            name,
            wire_name,
            tag,
            kind,
        }
    }
}

/// Look up a field by wire name
pub fn find_by_wire_name<'a>(fields: &'a [FieldSpec], wire_name: &str) -> Option<&'a FieldSpec> {
    fields.iter().find(|field| field.wire_name == wire_name)
}

//! Avro schema documents
//!
//! Loads the schema files consumed by the Avro adapters and checks them
//! against the explicit field tables of the record model before any adapter
//! compiles them.

use crate::error::{CodecError, CodecResult, ResourceError, ResourceResult};
use crate::model::{Container, FieldSpec, Record, WireKind};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// File name of the item schema
pub const ITEM_SCHEMA_FILE: &str = "sales_item.avsc";

/// File name of the container schema
pub const CONTAINER_SCHEMA_FILE: &str = "sales_item_container.avsc";

/// Raw schema documents for an item type and its container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocuments {
    /// Item record schema
    pub item: String,
    /// Container record schema
    pub container: String,
}

impl SchemaDocuments {
    /// Wrap already loaded documents
    pub fn new(item: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            container: container.into(),
        }
    }

    /// Read both documents from `dir`
    pub fn load(dir: &Path) -> ResourceResult<Self> {
        Ok(Self {
            item: read_document(&dir.join(ITEM_SCHEMA_FILE))?,
            container: read_document(&dir.join(CONTAINER_SCHEMA_FILE))?,
        })
    }

    /// Check both documents against the field tables of `C` and `C::Item`
    pub fn check<C: Container>(&self, codec: &str) -> CodecResult<()> {
        let item = parse_record(&self.item, codec)?;
        check_record(&item, C::Item::NAME, C::Item::FIELDS, codec)?;

        let container = parse_record(&self.container, codec)?;
        check_record(&container, C::NAME, C::FIELDS, codec)?;

        // An inline item definition inside the container must match as well
        for (spec, field) in C::FIELDS.iter().zip(record_fields(&container, codec)?) {
            if spec.kind == WireKind::RecordArray {
                if let Some(items) = field.get("type").and_then(|t| t.get("items")).filter(|i| i.is_object()) {
                    check_record(items, C::Item::NAME, C::Item::FIELDS, codec)?;
                }
            }
        }
        Ok(())
    }
}

fn read_document(path: &Path) -> ResourceResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ResourceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ResourceError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })
}

fn parse_record(document: &str, codec: &str) -> CodecResult<Value> {
    serde_json::from_str(document).map_err(|e| CodecError::schema(codec, format!("not valid JSON: {e}")))
}

fn record_fields<'v>(schema: &'v Value, codec: &str) -> CodecResult<&'v Vec<Value>> {
    schema
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| CodecError::schema(codec, "record schema has no fields array"))
}

fn check_record(schema: &Value, name: &str, specs: &[FieldSpec], codec: &str) -> CodecResult<()> {
    if schema.get("type").and_then(Value::as_str) != Some("record") {
        return Err(CodecError::schema(codec, format!("{name} schema is not a record")));
    }

    let fields = record_fields(schema, codec)?;
    if fields.len() != specs.len() {
        return Err(CodecError::schema(
            codec,
            format!("{name} declares {} fields, expected {}", fields.len(), specs.len()),
        ));
    }

    for (position, (field, spec)) in fields.iter().zip(specs).enumerate() {
        let field_name = field.get("name").and_then(Value::as_str).unwrap_or_default();
        if field_name != spec.wire_name {
            return Err(CodecError::schema(
                codec,
                format!("{name} field {position} is {field_name:?}, expected {:?}", spec.wire_name),
            ));
        }

        let field_type = field.get("type").unwrap_or(&Value::Null);
        if !type_matches(spec.kind, field_type) {
            return Err(CodecError::schema(
                codec,
                format!("{name}.{field_name} has type {field_type}, expected {:?}", spec.kind),
            ));
        }
    }
    Ok(())
}

fn type_matches(kind: WireKind, field_type: &Value) -> bool {
    match kind.avro_primitive() {
        Some(primitive) => {
            // Either "long" or {"type": "long", ...}
            field_type.as_str() == Some(primitive)
                || field_type.get("type").and_then(Value::as_str) == Some(primitive)
        }
        None => field_type.get("type").and_then(Value::as_str) == Some("array") && field_type.get("items").is_some(),
    }
}

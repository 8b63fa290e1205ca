//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use sales_serde_bench::codec::{Codec, CodecKind, DatasetCodec, JsonCodec, NamedCodec};
use sales_serde_bench::error::{CodecError, CodecResult};
use sales_serde_bench::model::{SalesItem, SalesItemContainer};

/// Schema directory of this crate
pub fn schema_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schemas")
}

/// Every registered codec, built against the crate schemas
pub fn all_codecs() -> Vec<Box<dyn DatasetCodec<SalesItemContainer>>> {
    CodecKind::ALL
        .into_iter()
        .map(|kind| kind.build(&schema_dir()).expect("codec setup"))
        .collect()
}

/// UTC timestamp with millisecond precision
pub fn utc(year: i32, month: u32, day: u32, millis: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap() + chrono::Duration::milliseconds(millis as i64)
}

/// A realistic record with the given order id
pub fn sales_item(order_id: i32) -> SalesItem {
    SalesItem {
        region: "Europe".to_string(),
        country: "Norway".to_string(),
        item_type: "Beverages".to_string(),
        sales_channel: "Online".to_string(),
        order_priority: "M".to_string(),
        order_date: utc(2014, 10, 18, 123),
        order_id,
        ship_date: utc(2014, 11, 2, 987),
        units_sold: 8_102,
        unit_price: 47.45,
        unit_cost: 31.79,
        total_revenue: 384_439.9,
        total_cost: 257_562.58,
        total_profit: 126_877.32,
    }
}

/// Records with order ids 101, 102 and 103
pub fn scenario_records() -> Vec<SalesItem> {
    (101..=103).map(sales_item).collect()
}

/// JSON codec that silently drops the last item of every container
pub struct LossyCodec;

impl NamedCodec for LossyCodec {
    fn name(&self) -> &'static str {
        "lossy"
    }
}

impl Codec<SalesItem> for LossyCodec {
    fn serialize_one(&self, value: &SalesItem) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_one(value)
    }

    fn serialize_many(&self, values: &[SalesItem]) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_many(values)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<SalesItem> {
        JsonCodec.deserialize_one(bytes)
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<SalesItem>> {
        JsonCodec.deserialize_many(bytes)
    }
}

impl Codec<SalesItemContainer> for LossyCodec {
    fn serialize_one(&self, value: &SalesItemContainer) -> CodecResult<Vec<u8>> {
        let mut items = value.items.clone();
        items.pop();
        JsonCodec.serialize_one(&SalesItemContainer { items })
    }

    fn serialize_many(&self, values: &[SalesItemContainer]) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_many(values)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<SalesItemContainer> {
        JsonCodec.deserialize_one(bytes)
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<SalesItemContainer>> {
        JsonCodec.deserialize_many(bytes)
    }
}

/// JSON codec whose container decoding works once, then fails
#[derive(Default)]
pub struct FlakyCodec {
    container_decodes: AtomicUsize,
}

impl NamedCodec for FlakyCodec {
    fn name(&self) -> &'static str {
        "flaky"
    }
}

impl Codec<SalesItem> for FlakyCodec {
    fn serialize_one(&self, value: &SalesItem) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_one(value)
    }

    fn serialize_many(&self, values: &[SalesItem]) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_many(values)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<SalesItem> {
        JsonCodec.deserialize_one(bytes)
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<SalesItem>> {
        JsonCodec.deserialize_many(bytes)
    }
}

impl Codec<SalesItemContainer> for FlakyCodec {
    fn serialize_one(&self, value: &SalesItemContainer) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_one(value)
    }

    fn serialize_many(&self, values: &[SalesItemContainer]) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_many(values)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<SalesItemContainer> {
        if self.container_decodes.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(CodecError::decode("flaky", "decoder worn out"));
        }
        JsonCodec.deserialize_one(bytes)
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<SalesItemContainer>> {
        JsonCodec.deserialize_many(bytes)
    }
}

/// JSON codec that cannot encode the separate-items shape
pub struct UnencodableCodec;

impl NamedCodec for UnencodableCodec {
    fn name(&self) -> &'static str {
        "unencodable"
    }
}

impl Codec<SalesItem> for UnencodableCodec {
    fn serialize_one(&self, value: &SalesItem) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_one(value)
    }

    fn serialize_many(&self, _values: &[SalesItem]) -> CodecResult<Vec<u8>> {
        Err(CodecError::encode("unencodable", "writer refused the batch"))
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<SalesItem> {
        JsonCodec.deserialize_one(bytes)
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<SalesItem>> {
        JsonCodec.deserialize_many(bytes)
    }
}

impl Codec<SalesItemContainer> for UnencodableCodec {
    fn serialize_one(&self, value: &SalesItemContainer) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_one(value)
    }

    fn serialize_many(&self, values: &[SalesItemContainer]) -> CodecResult<Vec<u8>> {
        JsonCodec.serialize_many(values)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<SalesItemContainer> {
        JsonCodec.deserialize_one(bytes)
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<SalesItemContainer>> {
        JsonCodec.deserialize_many(bytes)
    }
}

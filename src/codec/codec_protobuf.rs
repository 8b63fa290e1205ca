//! Protobuf codec backed by `prost`
//!
//! Messages are declared with `prost` derives and explicit tags that mirror
//! the record field tables. Every top-level message, in both shapes, carries
//! protobuf's standard varint length prefix.
//!
//! A bare protobuf message is not self-delimiting: a buffer cut exactly on a
//! field boundary would still decode, with the missing fields at their
//! defaults. The prefix makes any cut detectable.

use super::{Codec, NamedCodec};
use crate::error::{CodecError, CodecResult};
use crate::model::{SalesItem, SalesItemContainer};
use bytes::Buf;
use chrono::{DateTime, Utc};
use prost::Message;

/// Codec name
pub const NAME: &str = "protobuf";

/// Wire message for [`SalesItem`]
#[derive(Clone, PartialEq, Message)]
pub struct SalesItemMessage {
    /// Region
    #[prost(string, tag = "1")]
    pub region: String,
    /// Country
    #[prost(string, tag = "2")]
    pub country: String,
    /// ItemType
    #[prost(string, tag = "3")]
    pub item_type: String,
    /// SalesChannel
    #[prost(string, tag = "4")]
    pub sales_channel: String,
    /// OrderPriority
    #[prost(string, tag = "5")]
    pub order_priority: String,
    /// OrderDate, UTC epoch millis
    #[prost(int64, tag = "6")]
    pub order_date: i64,
    /// OrderID
    #[prost(int32, tag = "7")]
    pub order_id: i32,
    /// ShipDate, UTC epoch millis
    #[prost(int64, tag = "8")]
    pub ship_date: i64,
    /// UnitsSold
    #[prost(int32, tag = "9")]
    pub units_sold: i32,
    /// UnitPrice
    #[prost(double, tag = "10")]
    pub unit_price: f64,
    /// UnitCost
    #[prost(double, tag = "11")]
    pub unit_cost: f64,
    /// TotalRevenue
    #[prost(double, tag = "12")]
    pub total_revenue: f64,
    /// TotalCost
    #[prost(double, tag = "13")]
    pub total_cost: f64,
    /// TotalProfit
    #[prost(double, tag = "14")]
    pub total_profit: f64,
}

/// Wire message for [`SalesItemContainer`]
#[derive(Clone, PartialEq, Message)]
pub struct SalesItemContainerMessage {
    /// Items
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<SalesItemMessage>,
}

/// Conversion between a record and its protobuf message
pub trait ProtoMapped: Sized {
    /// Generated message type
    type Message: Message + Default;

    /// Build the wire message
    fn to_message(&self) -> Self::Message;

    /// Rebuild the record from a decoded message
    fn from_message(message: Self::Message) -> CodecResult<Self>;
}

fn timestamp(millis: i64) -> CodecResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| CodecError::decode(NAME, format!("timestamp {millis} out of range")))
}

impl ProtoMapped for SalesItem {
    type Message = SalesItemMessage;

    fn to_message(&self) -> SalesItemMessage {
        SalesItemMessage {
            region: self.region.clone(),
            country: self.country.clone(),
            item_type: self.item_type.clone(),
            sales_channel: self.sales_channel.clone(),
            order_priority: self.order_priority.clone(),
            order_date: self.order_date.timestamp_millis(),
            order_id: self.order_id,
            ship_date: self.ship_date.timestamp_millis(),
            units_sold: self.units_sold,
            unit_price: self.unit_price,
            unit_cost: self.unit_cost,
            total_revenue: self.total_revenue,
            total_cost: self.total_cost,
            total_profit: self.total_profit,
        }
    }

    fn from_message(message: SalesItemMessage) -> CodecResult<Self> {
        Ok(SalesItem {
            region: message.region,
            country: message.country,
            item_type: message.item_type,
            sales_channel: message.sales_channel,
            order_priority: message.order_priority,
            order_date: timestamp(message.order_date)?,
            order_id: message.order_id,
            ship_date: timestamp(message.ship_date)?,
            units_sold: message.units_sold,
            unit_price: message.unit_price,
            unit_cost: message.unit_cost,
            total_revenue: message.total_revenue,
            total_cost: message.total_cost,
            total_profit: message.total_profit,
        })
    }
}

impl ProtoMapped for SalesItemContainer {
    type Message = SalesItemContainerMessage;

    fn to_message(&self) -> SalesItemContainerMessage {
        SalesItemContainerMessage {
            items: self.items.iter().map(SalesItem::to_message).collect(),
        }
    }

    fn from_message(message: SalesItemContainerMessage) -> CodecResult<Self> {
        let items = message
            .items
            .into_iter()
            .map(SalesItem::from_message)
            .collect::<CodecResult<Vec<_>>>()?;
        Ok(SalesItemContainer { items })
    }
}

/// `prost` adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufCodec;

impl ProtobufCodec {
    /// Create the adapter
    pub fn new() -> Self {
        Self
    }
}

impl NamedCodec for ProtobufCodec {
    fn name(&self) -> &'static str {
        NAME
    }
}

impl<T: ProtoMapped> Codec<T> for ProtobufCodec {
    fn serialize_one(&self, value: &T) -> CodecResult<Vec<u8>> {
        Ok(value.to_message().encode_length_delimited_to_vec())
    }

    fn serialize_many(&self, values: &[T]) -> CodecResult<Vec<u8>> {
        let mut buffer = Vec::new();
        for value in values {
            value
                .to_message()
                .encode_length_delimited(&mut buffer)
                .map_err(|e| CodecError::encode(NAME, e))?;
        }
        Ok(buffer)
    }

    fn deserialize_one(&self, bytes: &[u8]) -> CodecResult<T> {
        let mut buffer = bytes;
        let message = T::Message::decode_length_delimited(&mut buffer).map_err(|e| CodecError::decode(NAME, e))?;
        if buffer.has_remaining() {
            return Err(CodecError::decode(
                NAME,
                format!("{} trailing bytes after message", buffer.remaining()),
            ));
        }
        T::from_message(message)
    }

    fn deserialize_many(&self, bytes: &[u8]) -> CodecResult<Vec<T>> {
        let mut items = Vec::new();
        let mut buffer = bytes;
        while buffer.has_remaining() {
            let message = T::Message::decode_length_delimited(&mut buffer).map_err(|e| CodecError::decode(NAME, e))?;
            items.push(T::from_message(message)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_tags_follow_field_table() {
        // Length prefix, then a single field encoded as (tag << 3 | wire type)
        for spec in SalesItem::FIELDS {
            let mut item = SalesItem::default();
            match spec.name {
                "region" => item.region = "x".to_string(),
                "country" => item.country = "x".to_string(),
                "item_type" => item.item_type = "x".to_string(),
                "sales_channel" => item.sales_channel = "x".to_string(),
                "order_priority" => item.order_priority = "x".to_string(),
                "order_date" => item.order_date = timestamp(1).unwrap(),
                "order_id" => item.order_id = 1,
                "ship_date" => item.ship_date = timestamp(1).unwrap(),
                "units_sold" => item.units_sold = 1,
                "unit_price" => item.unit_price = 1.0,
                "unit_cost" => item.unit_cost = 1.0,
                "total_revenue" => item.total_revenue = 1.0,
                "total_cost" => item.total_cost = 1.0,
                "total_profit" => item.total_profit = 1.0,
                other => panic!("unmapped field {other}"),
            }
            let bytes = Codec::<SalesItem>::serialize_one(&ProtobufCodec, &item).unwrap();
            assert_eq!(u32::from(bytes[1]) >> 3, spec.tag, "{}", spec.name);
        }
    }

    #[test]
    fn test_wire_bytes() {
        let item = SalesItem {
            order_id: 101,
            order_date: timestamp(0).unwrap(),
            ship_date: timestamp(0).unwrap(),
            ..SalesItem::default()
        };
        // Default values are omitted; length 2, tag 7 varint 101
        let bytes = Codec::<SalesItem>::serialize_one(&ProtobufCodec, &item).unwrap();
        assert_eq!(hex::encode(bytes), "023865");
    }

    #[test]
    fn test_out_of_range_timestamp_is_decode_error() {
        let message = SalesItemMessage {
            order_date: i64::MAX,
            ..SalesItemMessage::default()
        };
        let result: CodecResult<SalesItem> = ProtobufCodec.deserialize_one(&message.encode_length_delimited_to_vec());
        assert!(result.unwrap_err().is_decode());
    }

    #[test]
    fn test_length_delimited_items() {
        let items = vec![
            SalesItem {
                order_id: 5,
                ..SalesItem::default()
            },
            SalesItem::default(),
        ];
        let bytes = Codec::<SalesItem>::serialize_many(&ProtobufCodec, &items).unwrap();
        let decoded: Vec<SalesItem> = ProtobufCodec.deserialize_many(&bytes).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_cut_on_field_boundary_is_rejected() {
        let item = SalesItem {
            region: "Asia".to_string(),
            country: "Japan".to_string(),
            order_id: 7,
            ..SalesItem::default()
        };
        let bytes = Codec::<SalesItem>::serialize_one(&ProtobufCodec, &item).unwrap();
        // prefix (1) + region (2 + 4) + country (2 + 5)
        let result: CodecResult<SalesItem> = ProtobufCodec.deserialize_one(&bytes[..14]);
        assert!(result.unwrap_err().is_decode());

        let mut padded = bytes.clone();
        padded.push(0);
        let result: CodecResult<SalesItem> = ProtobufCodec.deserialize_one(&padded);
        assert!(result.unwrap_err().is_decode());
    }
}

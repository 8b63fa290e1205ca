//! Sales record schema

use super::{Container, FieldSpec, Record, RecordKind, WireKind};
use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sales transaction
///
/// Timestamps travel as UTC milliseconds since the epoch in every format, so
/// round trips preserve them to the millisecond.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesItem {
    /// Sales region
    pub region: String,
    /// Country within the region
    pub country: String,
    /// Product category
    pub item_type: String,
    /// `Online` or `Offline`
    pub sales_channel: String,
    /// Priority code (`L`, `M`, `H`, `C`)
    pub order_priority: String,
    /// When the order was placed
    #[serde(with = "ts_milliseconds")]
    pub order_date: DateTime<Utc>,
    /// Order identifier
    #[serde(rename = "OrderID")]
    pub order_id: i32,
    /// When the order shipped
    #[serde(with = "ts_milliseconds")]
    pub ship_date: DateTime<Utc>,
    /// Units in the order
    pub units_sold: i32,
    /// Price per unit
    pub unit_price: f64,
    /// Cost per unit
    pub unit_cost: f64,
    /// `units_sold * unit_price`
    pub total_revenue: f64,
    /// `units_sold * unit_cost`
    pub total_cost: f64,
    /// `total_revenue - total_cost`
    pub total_profit: f64,
}

const SALES_ITEM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("region", "Region", 1, WireKind::String),
    FieldSpec::new("country", "Country", 2, WireKind::String),
    FieldSpec::new("item_type", "ItemType", 3, WireKind::String),
    FieldSpec::new("sales_channel", "SalesChannel", 4, WireKind::String),
    FieldSpec::new("order_priority", "OrderPriority", 5, WireKind::String),
    FieldSpec::new("order_date", "OrderDate", 6, WireKind::TimestampMillis),
    FieldSpec::new("order_id", "OrderID", 7, WireKind::Int),
    FieldSpec::new("ship_date", "ShipDate", 8, WireKind::TimestampMillis),
    FieldSpec::new("units_sold", "UnitsSold", 9, WireKind::Int),
    FieldSpec::new("unit_price", "UnitPrice", 10, WireKind::Double),
    FieldSpec::new("unit_cost", "UnitCost", 11, WireKind::Double),
    FieldSpec::new("total_revenue", "TotalRevenue", 12, WireKind::Double),
    FieldSpec::new("total_cost", "TotalCost", 13, WireKind::Double),
    FieldSpec::new("total_profit", "TotalProfit", 14, WireKind::Double),
];

impl Record for SalesItem {
    const KIND: RecordKind = RecordKind::Item;
    const NAME: &'static str = "SalesItem";
    const FIELDS: &'static [FieldSpec] = SALES_ITEM_FIELDS;
}

/// All sales records of a dataset as one object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesItemContainer {
    /// Records in dataset order
    pub items: Vec<SalesItem>,
}

impl Record for SalesItemContainer {
    const KIND: RecordKind = RecordKind::Container;
    const NAME: &'static str = "SalesItemContainer";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::new("items", "Items", 1, WireKind::RecordArray)];
}

impl Container for SalesItemContainer {
    type Item = SalesItem;

    fn from_items(items: Vec<SalesItem>) -> Self {
        Self { items }
    }

    fn items(&self) -> &[SalesItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> SalesItem {
        SalesItem {
            region: "Europe".to_string(),
            country: "Norway".to_string(),
            item_type: "Cereal".to_string(),
            sales_channel: "Online".to_string(),
            order_priority: "H".to_string(),
            order_date: Utc.with_ymd_and_hms(2014, 10, 18, 0, 0, 0).unwrap(),
            order_id: 686800706,
            ship_date: Utc.with_ymd_and_hms(2014, 10, 31, 0, 0, 0).unwrap(),
            units_sold: 8446,
            unit_price: 437.2,
            unit_cost: 263.33,
            total_revenue: 3692591.2,
            total_cost: 2224085.18,
            total_profit: 1468506.02,
        }
    }

    #[test]
    fn test_wire_names_follow_field_table() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), SALES_ITEM_FIELDS.len());
        for field in SALES_ITEM_FIELDS {
            assert!(object.contains_key(field.wire_name), "missing {}", field.wire_name);
        }
    }

    #[test]
    fn test_timestamps_are_epoch_millis() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["OrderDate"], serde_json::json!(1413590400000i64));
    }

    #[test]
    fn test_structural_equality() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a, b);
        b.total_profit += 0.01;
        assert_ne!(a, b);
    }
}

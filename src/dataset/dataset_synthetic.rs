//! Deterministic synthetic sales records
//!
//! Produces rows shaped like the public "Sales Records" sample files: the
//! same regions, item types, unit prices and arithmetic for the totals. The
//! same `(rows, seed)` pair always yields the same records.

use super::DatasetProvider;
use crate::error::Result;
use crate::model::SalesItem;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const REGIONS: &[(&str, &[&str])] = &[
    ("Europe", &["Norway", "Germany", "Portugal", "Iceland", "Czech Republic"]),
    ("Asia", &["Mongolia", "Japan", "Vietnam", "Bangladesh"]),
    ("Sub-Saharan Africa", &["Chad", "Ghana", "Namibia", "Rwanda", "Senegal"]),
    ("Australia and Oceania", &["Fiji", "Samoa", "Tuvalu", "New Zealand"]),
    ("Middle East and North Africa", &["Morocco", "Egypt", "Jordan", "Libya"]),
    ("Central America and the Caribbean", &["Panama", "Haiti", "Belize", "Grenada"]),
    ("North America", &["Canada", "Mexico", "United States of America"]),
];

// (item type, unit price, unit cost)
const ITEM_TYPES: &[(&str, f64, f64)] = &[
    ("Baby Food", 255.28, 159.42),
    ("Beverages", 47.45, 31.79),
    ("Cereal", 205.70, 117.11),
    ("Clothes", 109.28, 35.84),
    ("Cosmetics", 437.20, 263.33),
    ("Fruits", 9.33, 6.92),
    ("Household", 668.27, 502.54),
    ("Meat", 421.89, 364.69),
    ("Office Supplies", 651.21, 524.96),
    ("Personal Care", 81.73, 56.67),
    ("Snacks", 152.58, 97.44),
    ("Vegetables", 154.06, 90.93),
];

const SALES_CHANNELS: &[&str] = &["Online", "Offline"];

const ORDER_PRIORITIES: &[&str] = &["L", "M", "H", "C"];

// 2010-01-01T00:00:00Z
const FIRST_ORDER_MILLIS: i64 = 1_262_304_000_000;

// Orders span roughly seven and a half years
const ORDER_SPAN_MILLIS: i64 = 7 * 365 * 24 * 3600 * 1000 + 180 * 24 * 3600 * 1000;

const MAX_SHIPPING_MILLIS: i64 = 50 * 24 * 3600 * 1000;

/// Seeded generator of sales records
#[derive(Debug, Clone, Copy)]
pub struct SyntheticDatasetProvider {
    rows: usize,
    seed: u64,
}

impl SyntheticDatasetProvider {
    /// Create a provider generating `rows` records from `seed`
    pub fn new(rows: usize, seed: u64) -> Self {
        Self { rows, seed }
    }

    fn generate(&self, rng: &mut StdRng) -> SalesItem {
        let (region, countries) = REGIONS[rng.random_range(0..REGIONS.len())];
        let country = countries[rng.random_range(0..countries.len())];
        let (item_type, unit_price, unit_cost) = ITEM_TYPES[rng.random_range(0..ITEM_TYPES.len())];

        let order_millis = FIRST_ORDER_MILLIS + rng.random_range(0..ORDER_SPAN_MILLIS);
        let ship_millis = order_millis + rng.random_range(0..MAX_SHIPPING_MILLIS);
        let units_sold: i32 = rng.random_range(1..=10_000);

        let total_revenue = round_cents(f64::from(units_sold) * unit_price);
        let total_cost = round_cents(f64::from(units_sold) * unit_cost);

        SalesItem {
            region: region.to_string(),
            country: country.to_string(),
            item_type: item_type.to_string(),
            sales_channel: SALES_CHANNELS[rng.random_range(0..SALES_CHANNELS.len())].to_string(),
            order_priority: ORDER_PRIORITIES[rng.random_range(0..ORDER_PRIORITIES.len())].to_string(),
            order_date: from_millis(order_millis),
            order_id: rng.random_range(100_000_000..1_000_000_000),
            ship_date: from_millis(ship_millis),
            units_sold,
            unit_price,
            unit_cost,
            total_revenue,
            total_cost,
            total_profit: round_cents(total_revenue - total_cost),
        }
    }
}

impl DatasetProvider for SyntheticDatasetProvider {
    fn get_data(&self) -> Result<Vec<SalesItem>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        Ok((0..self.rows).map(|_| self.generate(&mut rng)).collect())
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Generated offsets stay far inside chrono's range
fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_records() {
        let a = SyntheticDatasetProvider::new(50, 1).get_data().unwrap();
        let b = SyntheticDatasetProvider::new(50, 1).get_data().unwrap();
        assert_eq!(a, b);

        let c = SyntheticDatasetProvider::new(50, 2).get_data().unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_records_are_consistent() {
        for item in SyntheticDatasetProvider::new(200, 3).get_data().unwrap() {
            assert!(item.ship_date >= item.order_date);
            assert!(item.units_sold >= 1);
            assert_eq!(item.total_profit, round_cents(item.total_revenue - item.total_cost));
            assert!(REGIONS.iter().any(|(region, countries)| {
                *region == item.region && countries.contains(&item.country.as_str())
            }));
        }
    }

    #[test]
    fn test_zero_rows() {
        assert!(SyntheticDatasetProvider::new(0, 9).get_data().unwrap().is_empty());
    }
}

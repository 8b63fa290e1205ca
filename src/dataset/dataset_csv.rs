//! CSV dataset provider
//!
//! Reads the sales records file. Column headers are matched against the wire
//! names of [`SalesItem`] after dropping whitespace and case, so both
//! `ItemType` and `Item Type` select the same column.

use super::DatasetProvider;
use crate::error::{ResourceError, Result};
use crate::model::{Record, SalesItem};
use chrono::{DateTime, NaiveDate, Utc};
use csv::StringRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Loads the first `limit` rows of a CSV file
#[derive(Debug, Clone)]
pub struct CsvDatasetProvider {
    path: PathBuf,
    limit: usize,
}

impl CsvDatasetProvider {
    /// Create a provider reading at most `limit` rows of `path`
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
        }
    }

    /// Path of the CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, error: impl std::fmt::Display) -> ResourceError {
        ResourceError::Read {
            path: self.path.clone(),
            reason: error.to_string(),
        }
    }
}

impl DatasetProvider for CsvDatasetProvider {
    fn get_data(&self) -> Result<Vec<SalesItem>> {
        if !self.path.exists() {
            return Err(ResourceError::NotFound {
                path: self.path.clone(),
            }
            .into());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.read_error(e))?;

        let headers = reader.headers().map_err(|e| self.read_error(e))?.clone();
        let columns = Columns::resolve(&headers, &self.path)?;

        let mut items = Vec::with_capacity(self.limit.min(64 * 1024));
        for result in reader.records().take(self.limit) {
            let record = result.map_err(|e| self.read_error(e))?;
            let row = Row {
                record: &record,
                columns: &columns,
                path: &self.path,
                line: record.position().map(|p| p.line()).unwrap_or(0),
            };
            items.push(row.to_sales_item()?);
        }

        tracing::debug!(path = %self.path.display(), rows = items.len(), "csv dataset read");
        Ok(items)
    }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Column index of every field, keyed by wire name
struct Columns {
    by_wire_name: HashMap<&'static str, usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (normalize_header(header), index))
            .collect();

        let mut by_wire_name = HashMap::with_capacity(SalesItem::FIELDS.len());
        for field in SalesItem::FIELDS {
            let index = positions
                .get(&normalize_header(field.wire_name))
                .ok_or_else(|| ResourceError::Dataset {
                    path: path.to_path_buf(),
                    line: 1,
                    reason: format!("missing column {}", field.wire_name),
                })?;
            by_wire_name.insert(field.wire_name, *index);
        }

        Ok(Self { by_wire_name })
    }
}

struct Row<'a> {
    record: &'a StringRecord,
    columns: &'a Columns,
    path: &'a Path,
    line: u64,
}

impl Row<'_> {
    fn invalid(&self, column: &str, reason: impl std::fmt::Display) -> ResourceError {
        ResourceError::Dataset {
            path: self.path.to_path_buf(),
            line: self.line,
            reason: format!("invalid {column}: {reason}"),
        }
    }

    fn text(&self, column: &'static str) -> Result<&str> {
        self.columns
            .by_wire_name
            .get(column)
            .and_then(|index| self.record.get(*index))
            .ok_or_else(|| self.invalid(column, "missing value").into())
    }

    fn parse<T>(&self, column: &'static str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.text(column)?;
        raw.parse::<T>().map_err(|e| self.invalid(column, e).into())
    }

    fn timestamp(&self, column: &'static str) -> Result<DateTime<Utc>> {
        let raw = self.text(column)?;
        parse_timestamp(raw).ok_or_else(|| self.invalid(column, format!("unrecognized date {raw:?}")).into())
    }

    fn to_sales_item(&self) -> Result<SalesItem> {
        Ok(SalesItem {
            region: self.text("Region")?.to_string(),
            country: self.text("Country")?.to_string(),
            item_type: self.text("ItemType")?.to_string(),
            sales_channel: self.text("SalesChannel")?.to_string(),
            order_priority: self.text("OrderPriority")?.to_string(),
            order_date: self.timestamp("OrderDate")?,
            order_id: self.parse("OrderID")?,
            ship_date: self.timestamp("ShipDate")?,
            units_sold: self.parse("UnitsSold")?,
            unit_price: self.parse("UnitPrice")?,
            unit_cost: self.parse("UnitCost")?,
            total_revenue: self.parse("TotalRevenue")?,
            total_cost: self.parse("TotalCost")?,
            total_profit: self.parse("TotalProfit")?,
        })
    }
}

/// Parse a timestamp column and normalize it to UTC
///
/// Accepts RFC 3339 (`2014-10-18T00:00:00Z`), ISO dates (`2014-10-18`) and US
/// dates (`10/18/2014`). Date-only values land at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    ["%m/%d/%Y", "%Y-%m-%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2014, 10, 18, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("10/18/2014"), Some(expected));
        assert_eq!(parse_timestamp("2014-10-18"), Some(expected));
        assert_eq!(parse_timestamp("2014-10-18T02:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("18.10.2014"), None);
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Item Type"), "itemtype");
        assert_eq!(normalize_header("ItemType"), "itemtype");
        assert_eq!(normalize_header("Order ID"), "orderid");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let provider = CsvDatasetProvider::new("does/not/exist.csv", 10);
        let error = provider.get_data().unwrap_err();
        assert!(matches!(
            error,
            crate::Error::Resource(ResourceError::NotFound { .. })
        ));
    }
}

//! CSV exports of trip mileage and fuel receipts, as produced by ELD and
//! fuel-card portals, turned into IFTA inputs.

use crate::domain::{FuelPurchase, MileageRecord};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RecordImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unrecognised date '{value}' (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: jurisdiction is empty")]
    MissingJurisdiction { row: usize },
}

#[derive(Debug, Deserialize)]
struct MileageRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Jurisdiction")]
    jurisdiction: String,
    #[serde(rename = "Miles")]
    miles: u32,
    #[serde(rename = "Load ID", default, deserialize_with = "empty_string_as_none")]
    load_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FuelRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Jurisdiction")]
    jurisdiction: String,
    #[serde(rename = "Gallons")]
    gallons: Decimal,
    #[serde(rename = "Price Per Gallon")]
    price_per_gallon: Decimal,
    #[serde(rename = "Total Cost", default)]
    total_cost: Option<Decimal>,
    #[serde(rename = "Location", default)]
    location: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn jurisdiction_code(row: usize, raw: &str) -> Result<String, RecordImportError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(RecordImportError::MissingJurisdiction { row });
    }
    Ok(code)
}

fn row_date(row: usize, raw: &str) -> Result<DateTime<Utc>, RecordImportError> {
    parse_datetime(raw).ok_or_else(|| RecordImportError::InvalidDate {
        row,
        value: raw.to_string(),
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<std::fs::File, RecordImportError> {
    std::fs::File::open(path).map_err(|source| RecordImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Columns: `Date,Jurisdiction,Miles,Load ID`.
pub fn mileage_from_path(path: &Path) -> Result<Vec<MileageRecord>, RecordImportError> {
    mileage_from_reader(open(path)?)
}

pub fn mileage_from_reader<R: Read>(reader: R) -> Result<Vec<MileageRecord>, RecordImportError> {
    let mut records = Vec::new();
    for (index, row) in csv_reader(reader).deserialize::<MileageRow>().enumerate() {
        let row_number = index + 1;
        let row = row?;
        records.push(MileageRecord {
            date: row_date(row_number, &row.date)?,
            jurisdiction: jurisdiction_code(row_number, &row.jurisdiction)?,
            miles: row.miles,
            load_id: row.load_id,
        });
    }
    Ok(records)
}

/// Columns: `Date,Jurisdiction,Gallons,Price Per Gallon,Total Cost,Location`.
///
/// A blank total is computed from gallons and price.
pub fn fuel_from_path(path: &Path) -> Result<Vec<FuelPurchase>, RecordImportError> {
    fuel_from_reader(open(path)?)
}

pub fn fuel_from_reader<R: Read>(reader: R) -> Result<Vec<FuelPurchase>, RecordImportError> {
    let mut purchases = Vec::new();
    for (index, row) in csv_reader(reader).deserialize::<FuelRow>().enumerate() {
        let row_number = index + 1;
        let row = row?;
        purchases.push(FuelPurchase {
            timestamp: row_date(row_number, &row.date)?,
            jurisdiction: jurisdiction_code(row_number, &row.jurisdiction)?,
            gallons: row.gallons,
            price_per_gallon: row.price_per_gallon,
            total_cost: row
                .total_cost
                .unwrap_or(row.gallons * row.price_per_gallon),
            location: row.location,
        });
    }
    Ok(purchases)
}

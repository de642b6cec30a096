//! Record types shared by the reader, the store and the report.
//!
//! The spreadsheet side produces [`RawRecord`]s that hold whatever the cells
//! contained. [`NewRecord::from_raw`] is the single place where defaults are
//! filled in and cell values are converted to the column types.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use tracing::warn;

/// Sentinel stored when the source id cell is empty
pub const DEFAULT_SOURCE_ID: &str = "0";

/// Sentinel stored when the company cell is empty
pub const DEFAULT_COMPANY: &str = "company1";

/// Maximum length of the company column
pub const COMPANY_MAX_LEN: usize = 10;

/// Spreadsheet columns 1..=10, in sheet order
pub const COLUMN_ORDER: [&str; 10] = [
    "sid",
    "company",
    "fact_qliq_1",
    "fact_qliq_2",
    "fact_qoil_1",
    "fact_qoil_2",
    "forecast_qliq_1",
    "forecast_qliq_2",
    "forecast_qoil_1",
    "forecast_qoil_2",
];

/// Counter columns, in sheet and report order
pub const COUNTER_COLUMNS: [&str; 8] = [
    "fact_qliq_1",
    "fact_qliq_2",
    "fact_qoil_1",
    "fact_qoil_2",
    "forecast_qliq_1",
    "forecast_qliq_2",
    "forecast_qoil_1",
    "forecast_qoil_2",
];

/// A non-empty spreadsheet cell, as read
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(String),
    Error(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) if v.fract() == 0.0 => write!(f, "{:.0}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Error(e) => write!(f, "#ERROR: {}", e),
        }
    }
}

/// One spreadsheet row, unvalidated, stamped with the batch date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub source_id: Option<CellValue>,
    pub company: Option<CellValue>,
    pub fact_qliq_1: Option<CellValue>,
    pub fact_qliq_2: Option<CellValue>,
    pub fact_qoil_1: Option<CellValue>,
    pub fact_qoil_2: Option<CellValue>,
    pub forecast_qliq_1: Option<CellValue>,
    pub forecast_qliq_2: Option<CellValue>,
    pub forecast_qoil_1: Option<CellValue>,
    pub forecast_qoil_2: Option<CellValue>,
    pub date: NaiveDate,
}

impl RawRecord {
    /// Bind the ten cells of a row to fields, in [`COLUMN_ORDER`]
    pub fn from_cells(cells: [Option<CellValue>; 10], date: NaiveDate) -> Self {
        let [source_id, company, fact_qliq_1, fact_qliq_2, fact_qoil_1, fact_qoil_2, forecast_qliq_1, forecast_qliq_2, forecast_qoil_1, forecast_qoil_2] =
            cells;
        Self {
            source_id,
            company,
            fact_qliq_1,
            fact_qliq_2,
            fact_qoil_1,
            fact_qoil_2,
            forecast_qliq_1,
            forecast_qliq_2,
            forecast_qoil_1,
            forecast_qoil_2,
            date,
        }
    }

    fn counter_cells(&self) -> [Option<&CellValue>; 8] {
        [
            self.fact_qliq_1.as_ref(),
            self.fact_qliq_2.as_ref(),
            self.fact_qoil_1.as_ref(),
            self.fact_qoil_2.as_ref(),
            self.forecast_qliq_1.as_ref(),
            self.forecast_qliq_2.as_ref(),
            self.forecast_qoil_1.as_ref(),
            self.forecast_qoil_2.as_ref(),
        ]
    }
}

/// The eight production counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Counters {
    pub fact_qliq_1: i64,
    pub fact_qliq_2: i64,
    pub fact_qoil_1: i64,
    pub fact_qoil_2: i64,
    pub forecast_qliq_1: i64,
    pub forecast_qliq_2: i64,
    pub forecast_qoil_1: i64,
    pub forecast_qoil_2: i64,
}

impl Counters {
    pub fn from_values(values: [i64; 8]) -> Self {
        let [fact_qliq_1, fact_qliq_2, fact_qoil_1, fact_qoil_2, forecast_qliq_1, forecast_qliq_2, forecast_qoil_1, forecast_qoil_2] =
            values;
        Self {
            fact_qliq_1,
            fact_qliq_2,
            fact_qoil_1,
            fact_qoil_2,
            forecast_qliq_1,
            forecast_qliq_2,
            forecast_qoil_1,
            forecast_qoil_2,
        }
    }

    /// Values in [`COUNTER_COLUMNS`] order
    pub fn values(&self) -> [i64; 8] {
        [
            self.fact_qliq_1,
            self.fact_qliq_2,
            self.fact_qoil_1,
            self.fact_qoil_2,
            self.forecast_qliq_1,
            self.forecast_qliq_2,
            self.forecast_qoil_1,
            self.forecast_qoil_2,
        ]
    }
}

/// A typed record, ready to insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub source_id: String,
    pub company: String,
    pub date: NaiveDate,
    pub counters: Counters,
}

impl NewRecord {
    /// Fill in defaults for empty cells and convert the rest to column types
    pub fn from_raw(raw: &RawRecord) -> Result<Self> {
        let mut values = [0i64; 8];
        for (slot, (column, cell)) in values
            .iter_mut()
            .zip(COUNTER_COLUMNS.iter().zip(raw.counter_cells()))
        {
            *slot = counter_value(column, cell)?;
        }

        Ok(Self {
            source_id: text_value(raw.source_id.as_ref(), DEFAULT_SOURCE_ID),
            company: text_value(raw.company.as_ref(), DEFAULT_COMPANY),
            date: raw.date,
            counters: Counters::from_values(values),
        })
    }
}

/// A persisted row of the `datastream` table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[sqlx(rename = "sid")]
    pub source_id: String,
    pub company: String,
    pub date: NaiveDate,
    #[sqlx(flatten)]
    pub counters: Counters,
}

fn text_value(cell: Option<&CellValue>, default: &str) -> String {
    match cell {
        None => default.to_string(),
        Some(CellValue::Text(s)) if s.trim().is_empty() => default.to_string(),
        Some(value) => value.to_string(),
    }
}

fn counter_value(column: &str, cell: Option<&CellValue>) -> Result<i64> {
    match cell {
        None => Ok(0),
        Some(CellValue::Int(i)) => Ok(*i),
        Some(CellValue::Float(v)) if v.is_finite() => {
            if v.fract() != 0.0 {
                warn!("Truncating fractional value {} in column {}", v, column);
            }
            Ok(v.trunc() as i64)
        }
        Some(CellValue::Bool(b)) => Ok(i64::from(*b)),
        Some(CellValue::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed.parse::<i64>().map_err(|_| {
                Error::Constraint(format!(
                    "column {} expects an integer, got '{}'",
                    column, trimmed
                ))
            })
        }
        Some(other) => Err(Error::Constraint(format!(
            "column {} expects an integer, got '{}'",
            column, other
        ))),
    }
}

//! datastation - import production data from spreadsheets and report on it
//!
//! This crate provides:
//! - A spreadsheet reader mapping fixed sheet columns to record fields
//! - A SQLite record store that appends dated batches atomically
//! - A per-date aggregate report rendered as a fixed-width text table

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod progress;
pub mod reader;
pub mod report;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{Counters, NewRecord, RawRecord, Record};
pub use reader::SpreadsheetReader;
pub use report::{DateAggregateReport, ReportRow};
pub use store::RecordStore;

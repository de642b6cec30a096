//! Load command - import one workbook as a dated batch

use crate::config::Config;
use crate::error::Result;
use crate::progress::add_progress_bar;
use crate::reader::SpreadsheetReader;
use crate::store::RecordStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Load statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadStats {
    pub file: PathBuf,
    pub sheet: String,
    pub date: NaiveDate,
    pub rows_read: usize,
    pub records_saved: usize,
    pub db_path: PathBuf,
}

/// Read `file` and append its rows to the store, all stamped with `date`
///
/// The workbook is read completely before the store is opened, so a bad
/// file never touches the database.
pub async fn cmd_load(config: &Config, file: &Path, date: NaiveDate) -> Result<LoadStats> {
    info!("Loading {:?} for {}", file, date);

    let reader = SpreadsheetReader::open_with_first_row(file, date, config.import.first_data_row)?;
    let sheet = reader.sheet_name().to_string();
    let records = reader.records();
    drop(reader);
    info!("Read {} rows from sheet '{}'", records.len(), sheet);

    let store = RecordStore::connect(&config.database).await?;

    let progress = add_progress_bar(records.len() as u64);
    let saved = store.save_with_progress(&records, &progress).await;
    progress.finish_and_clear();
    let records_saved = saved?;

    let db_path = store.path().to_path_buf();
    store.close().await;

    Ok(LoadStats {
        file: file.to_path_buf(),
        sheet,
        date,
        rows_read: records.len(),
        records_saved,
        db_path,
    })
}

pub fn print_load_stats(stats: &LoadStats) {
    println!(
        "✓ Read {} rows from {} (sheet '{}')",
        stats.rows_read,
        stats.file.display(),
        stats.sheet
    );
    println!(
        "✓ Loaded {} records dated {} into {}",
        stats.records_saved,
        stats.date,
        stats.db_path.display()
    );
}

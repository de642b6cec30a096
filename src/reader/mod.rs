//! Spreadsheet reading using calamine.
//!
//! Only the first sheet of a workbook is read. Rows above the first data row
//! are header/metadata and are skipped regardless of content; every row from
//! there through the last populated row becomes one [`RawRecord`].

use crate::config::default_first_data_row;
use crate::error::{Error, Result};
use crate::models::{CellValue, RawRecord};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads production rows from the first sheet of a workbook
pub struct SpreadsheetReader {
    path: PathBuf,
    sheet_name: String,
    sheet: Range<Data>,
    date: NaiveDate,
    first_data_row: u32,
}

impl SpreadsheetReader {
    /// Open a workbook; every record read from it is stamped with `date`
    pub fn open(path: impl AsRef<Path>, date: NaiveDate) -> Result<Self> {
        Self::open_with_first_row(path, date, default_first_data_row())
    }

    /// Open a workbook whose data starts at `first_data_row` (1-based)
    pub fn open_with_first_row(
        path: impl AsRef<Path>,
        date: NaiveDate,
        first_data_row: u32,
    ) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(Error::file_access(path.display(), "file not found"));
        }

        let mut workbook =
            open_workbook_auto(path).map_err(|e| Error::file_access(path.display(), e))?;

        let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
            Error::Format(format!("{}: workbook has no sheets", path.display()))
        })?;

        let sheet = workbook.worksheet_range(&sheet_name).map_err(|e| {
            Error::Format(format!(
                "{}: cannot read sheet '{}': {}",
                path.display(),
                sheet_name,
                e
            ))
        })?;

        debug!(
            "Opened sheet '{}' of {:?}, used range ends at {:?}",
            sheet_name,
            path,
            sheet.end()
        );

        Ok(Self {
            path: path.to_path_buf(),
            sheet_name,
            sheet,
            date,
            first_data_row: first_data_row.max(1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Number of data rows the sheet holds
    pub fn row_count(&self) -> usize {
        self.data_rows().len()
    }

    /// All data rows, in sheet order
    pub fn records(&self) -> Vec<RawRecord> {
        self.data_rows()
            .map(|row| row_record(&self.sheet, row, self.date))
            .collect()
    }

    /// Consume the reader, yielding data rows in sheet order
    pub fn into_records(self) -> impl Iterator<Item = RawRecord> {
        let rows = self.data_rows();
        rows.map(move |row| row_record(&self.sheet, row, self.date))
    }

    /// Absolute, 0-based indices of the data rows
    fn data_rows(&self) -> std::ops::Range<u32> {
        let first = self.first_data_row - 1;
        match self.sheet.end() {
            Some((last, _)) if last >= first => first..last + 1,
            _ => first..first,
        }
    }
}

fn row_record(sheet: &Range<Data>, row: u32, date: NaiveDate) -> RawRecord {
    let cells = std::array::from_fn(|col| sheet.get_value((row, col as u32)).and_then(cell_value));
    RawRecord::from_cells(cells, date)
}

/// Convert a calamine cell; empty cells have no value
fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Int(*i)),
        Data::Float(f) => Some(CellValue::Float(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::DateTime(dt.to_string())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::DateTime(s.clone())),
        Data::Error(e) => Some(CellValue::Error(format!("{:?}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_workbook;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 25).unwrap()
    }

    const HEADER: [&[&str]; 3] = [
        &["Production report"],
        &["sid", "company", "fact", "", "", "", "forecast"],
        &["", "", "qliq1", "qliq2", "qoil1", "qoil2", "qliq1", "qliq2", "qoil1", "qoil2"],
    ];

    #[test]
    fn test_reads_rows_after_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.xlsx");
        let mut rows: Vec<&[&str]> = HEADER.to_vec();
        rows.push(&["A1", "c1", "10", "20", "30", "40", "50", "60", "70", "80"]);
        rows.push(&["B2", "c2", "1", "2", "3", "4", "5", "6", "7", "8"]);
        write_workbook(&path, &rows);

        let reader = SpreadsheetReader::open(&path, date()).unwrap();
        assert_eq!(reader.row_count(), 2);

        let records = reader.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source_id, Some(CellValue::Text("A1".to_string())));
        assert_eq!(records[0].company, Some(CellValue::Text("c1".to_string())));
        assert_eq!(records[0].fact_qliq_1, Some(CellValue::Float(10.0)));
        assert_eq!(records[0].forecast_qoil_2, Some(CellValue::Float(80.0)));
        assert_eq!(records[1].source_id, Some(CellValue::Text("B2".to_string())));
        assert_eq!(records[1].fact_qoil_1, Some(CellValue::Float(3.0)));
        assert!(records.iter().all(|r| r.date == date()));
    }

    #[test]
    fn test_header_only_sheet_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.xlsx");
        write_workbook(&path, &HEADER);

        let reader = SpreadsheetReader::open(&path, date()).unwrap();
        assert_eq!(reader.row_count(), 0);
        assert!(reader.records().is_empty());
    }

    #[test]
    fn test_header_rows_never_read_even_if_numeric() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("numeric_header.xlsx");
        write_workbook(
            &path,
            &[
                &["999", "x", "999"],
                &["999", "x", "999"],
                &["999", "x", "999"],
                &["S1", "c1", "5"],
            ],
        );

        let records = SpreadsheetReader::open(&path, date()).unwrap().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_id, Some(CellValue::Text("S1".to_string())));
        assert_eq!(records[0].fact_qliq_1, Some(CellValue::Float(5.0)));
    }

    #[test]
    fn test_empty_cells_are_absent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gaps.xlsx");
        let mut rows: Vec<&[&str]> = HEADER.to_vec();
        rows.push(&["", "c1", "", "7"]);
        write_workbook(&path, &rows);

        let records = SpreadsheetReader::open(&path, date()).unwrap().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_id, None);
        assert_eq!(records[0].fact_qliq_1, None);
        assert_eq!(records[0].fact_qliq_2, Some(CellValue::Float(7.0)));
        assert_eq!(records[0].forecast_qoil_2, None);
    }

    #[test]
    fn test_into_records_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("order.xlsx");
        let mut rows: Vec<&[&str]> = HEADER.to_vec();
        rows.push(&["r4"]);
        rows.push(&["r5"]);
        rows.push(&["r6"]);
        write_workbook(&path, &rows);

        let ids: Vec<_> = SpreadsheetReader::open(&path, date())
            .unwrap()
            .into_records()
            .map(|r| r.source_id.map(|c| c.to_string()))
            .collect();
        assert_eq!(
            ids,
            vec![
                Some("r4".to_string()),
                Some("r5".to_string()),
                Some("r6".to_string())
            ]
        );
    }

    #[test]
    fn test_custom_first_row() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("short_header.xlsx");
        write_workbook(&path, &[&["header"], &["S1", "c1", "1"], &["S2", "c1", "2"]]);

        let reader = SpreadsheetReader::open_with_first_row(&path, date(), 2).unwrap();
        assert_eq!(reader.row_count(), 2);
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let tmp = TempDir::new().unwrap();
        let result = SpreadsheetReader::open(tmp.path().join("absent.xlsx"), date());
        assert!(matches!(result, Err(Error::FileAccess { .. })));
    }

    #[test]
    fn test_corrupt_file_is_file_access_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        let result = SpreadsheetReader::open(&path, date());
        assert!(matches!(result, Err(Error::FileAccess { .. })));
    }

    #[test]
    fn test_workbook_without_sheets_is_format_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("no_sheets.xlsx");
        crate::test_support::write_workbook_without_sheets(&path);

        let result = SpreadsheetReader::open(&path, date());
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_cell_value_conversion() {
        assert_eq!(cell_value(&Data::Empty), None);
        assert_eq!(
            cell_value(&Data::String("x".to_string())),
            Some(CellValue::Text("x".to_string()))
        );
        assert_eq!(cell_value(&Data::Int(3)), Some(CellValue::Int(3)));
        assert_eq!(cell_value(&Data::Float(2.5)), Some(CellValue::Float(2.5)));
        assert_eq!(cell_value(&Data::Bool(false)), Some(CellValue::Bool(false)));
    }
}

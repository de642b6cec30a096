//! Default values for configuration

use std::path::PathBuf;

/// Default SQLite database file
pub fn default_database_path() -> PathBuf {
    PathBuf::from("datastation.db")
}

/// Default workbook to import when no file is given
pub fn default_import_file() -> PathBuf {
    PathBuf::from("data_packet.xlsx")
}

/// Rows above this one (1-based) hold the sheet's header block
pub fn default_first_data_row() -> u32 {
    4
}

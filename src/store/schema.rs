//! SQLite schema definition

/// Table holding imported production records
pub const TABLE_NAME: &str = "datastream";

/// SQL schema for the record store; safe to run on every start
pub const SCHEMA_SQL: &str = r#"
-- Production records: one row per imported spreadsheet row
CREATE TABLE IF NOT EXISTS datastream (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sid TEXT NOT NULL DEFAULT '0',
    company TEXT NOT NULL DEFAULT 'company1' CHECK (length(company) <= 10),
    date TEXT NOT NULL,
    fact_qliq_1 INTEGER NOT NULL DEFAULT 0,
    fact_qliq_2 INTEGER NOT NULL DEFAULT 0,
    fact_qoil_1 INTEGER NOT NULL DEFAULT 0,
    fact_qoil_2 INTEGER NOT NULL DEFAULT 0,
    forecast_qliq_1 INTEGER NOT NULL DEFAULT 0,
    forecast_qliq_2 INTEGER NOT NULL DEFAULT 0,
    forecast_qoil_1 INTEGER NOT NULL DEFAULT 0,
    forecast_qoil_2 INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_datastream_date ON datastream(date);
"#;

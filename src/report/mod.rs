//! Per-date aggregate report
//!
//! Sums every counter over the records sharing a date and renders the
//! result as a fixed-width text table, one row per date in ascending order.

use crate::error::Result;
use crate::models::Counters;
use crate::store::RecordStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use tracing::debug;

/// Width of each counter column
pub const VALUE_WIDTH: usize = 5;

const HEADER: [&str; 7] = [
    "+------------+-------------------------------+-------------------------------+",
    "|            |              Fact             |           Forecast            |",
    "|            |---------------+---------------+---------------+---------------+",
    "|    Date    |      Qliq     |      Qoil     |      Qliq     |      Qoil     |",
    "|            |-------+-------+-------+-------+-------+-------+-------+-------+",
    "|            | Data1 | Data2 | Data1 | Data2 | Data1 | Data2 | Data1 | Data2 |",
    "+------------+-------+-------+-------+-------+-------+-------+-------+-------+",
];

const ROW_BORDER: &str =
    "+------------+-------+-------+-------+-------+-------+-------+-------+-------+";

const AGGREGATE_SQL: &str = r#"
SELECT
    date,
    SUM(fact_qliq_1) AS fact_qliq_1,
    SUM(fact_qliq_2) AS fact_qliq_2,
    SUM(fact_qoil_1) AS fact_qoil_1,
    SUM(fact_qoil_2) AS fact_qoil_2,
    SUM(forecast_qliq_1) AS forecast_qliq_1,
    SUM(forecast_qliq_2) AS forecast_qliq_2,
    SUM(forecast_qoil_1) AS forecast_qoil_1,
    SUM(forecast_qoil_2) AS forecast_qoil_2
FROM datastream
GROUP BY date
ORDER BY date
"#;

/// Counter totals for one date
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ReportRow {
    pub date: NaiveDate,
    #[sqlx(flatten)]
    pub totals: Counters,
}

/// Report grouping all stored records by date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateAggregateReport {
    rows: Vec<ReportRow>,
}

impl DateAggregateReport {
    /// Query the store and aggregate; an empty store gives an empty report
    pub async fn generate(store: &RecordStore) -> Result<Self> {
        store.ensure_schema().await?;

        let rows = sqlx::query_as::<_, ReportRow>(AGGREGATE_SQL)
            .fetch_all(store.pool())
            .await?;

        debug!("Aggregated {} dates", rows.len());
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<ReportRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for DateAggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&HEADER.join("\n"))?;

        for row in &self.rows {
            write!(f, "\n| {} |", row.date.format("%d.%m.%Y"))?;
            for value in row.totals.values() {
                write!(f, " {:^width$} |", value, width = VALUE_WIDTH)?;
            }
            write!(f, "\n{}", ROW_BORDER)?;
        }

        Ok(())
    }
}

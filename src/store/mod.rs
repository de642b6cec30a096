//! Record storage using SQLite
//!
//! The `datastream` table is append-only: batches are inserted inside a
//! single transaction and nothing is ever updated or deleted.

mod schema;

pub use schema::*;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::models::{NewRecord, RawRecord, Record};
use indicatif::ProgressBar;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Record store handle
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl RecordStore {
    /// Open (creating if missing) the database and make sure the table exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_path = &config.path;

        // Create parent directory if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Connection(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        // One connection: the store has a single writer
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            path: db_path.clone(),
        };

        if !store.is_initialized().await? {
            store.ensure_schema().await?;
        }

        Ok(store)
    }

    /// Create the table and index if they do not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        debug!("Ensuring database schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Check if the record table exists
    pub async fn is_initialized(&self) -> Result<bool> {
        let result: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?")
                .bind(TABLE_NAME)
                .fetch_optional(&self.pool)
                .await?;
        Ok(result.is_some())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Append a batch atomically; returns the number of rows inserted
    ///
    /// Empty cells take the column defaults. If any record fails conversion
    /// or insertion, the transaction is rolled back and nothing is stored.
    pub async fn save(&self, records: &[RawRecord]) -> Result<usize> {
        self.save_batch(records, None).await
    }

    /// Same as [`RecordStore::save`], advancing `progress` once per row
    pub async fn save_with_progress(
        &self,
        records: &[RawRecord],
        progress: &ProgressBar,
    ) -> Result<usize> {
        self.save_batch(records, Some(progress)).await
    }

    async fn save_batch(
        &self,
        records: &[RawRecord],
        progress: Option<&ProgressBar>,
    ) -> Result<usize> {
        self.ensure_schema().await?;

        // Dropping the transaction on an early return rolls it back
        let mut tx = self.pool.begin().await?;

        for (idx, raw) in records.iter().enumerate() {
            let record = NewRecord::from_raw(raw).map_err(|e| in_record(idx, e))?;
            insert_record(&mut tx, &record)
                .await
                .map_err(|e| in_record(idx, e))?;

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        tx.commit().await?;

        info!("Saved {} records to {:?}", records.len(), self.path);
        Ok(records.len())
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM datastream")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// All stored records in insertion order
    pub async fn list_records(&self) -> Result<Vec<Record>> {
        let records = sqlx::query_as::<_, Record>("SELECT * FROM datastream ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Close the pool, waiting for the connection to be released
    pub async fn close(self) {
        self.pool.close().await;
    }
}

async fn insert_record(tx: &mut Transaction<'_, Sqlite>, record: &NewRecord) -> Result<()> {
    let c = &record.counters;
    sqlx::query(
        r#"
        INSERT INTO datastream (
            sid, company, date,
            fact_qliq_1, fact_qliq_2, fact_qoil_1, fact_qoil_2,
            forecast_qliq_1, forecast_qliq_2, forecast_qoil_1, forecast_qoil_2
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.source_id)
    .bind(&record.company)
    .bind(record.date)
    .bind(c.fact_qliq_1)
    .bind(c.fact_qliq_2)
    .bind(c.fact_qoil_1)
    .bind(c.fact_qoil_2)
    .bind(c.forecast_qliq_1)
    .bind(c.forecast_qliq_2)
    .bind(c.forecast_qoil_1)
    .bind(c.forecast_qoil_2)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn in_record(idx: usize, err: Error) -> Error {
    match err {
        Error::Constraint(msg) => Error::Constraint(format!("record {}: {}", idx + 1, msg)),
        other => other,
    }
}

//! Report command implementation

use crate::config::Config;
use crate::error::Result;
use crate::report::DateAggregateReport;
use crate::store::RecordStore;
use tracing::info;

/// Build the per-date report from the configured store
pub async fn cmd_report(config: &Config) -> Result<DateAggregateReport> {
    info!("Generating report from {:?}", config.database.path);

    let store = RecordStore::connect(&config.database).await?;
    let report = DateAggregateReport::generate(&store).await;
    store.close().await;

    report
}

pub fn print_report(report: &DateAggregateReport) {
    println!("Report generated:");
    println!("{}", report);
}

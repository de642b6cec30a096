//! datastation CLI entry point

use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use datastation::{
    commands::{cmd_load, cmd_report, print_load_stats, print_report},
    config::Config,
    error::{Error, Result},
    progress::LogWriterFactory,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "datastation")]
#[command(
    version,
    about = "Import production data from spreadsheets and report totals by date",
    long_about = None
)]
struct Cli {
    /// Load data from a workbook
    #[arg(short, long)]
    load: bool,

    /// Workbook to load [default: data_packet.xlsx]
    #[arg(short, long)]
    filename: Option<PathBuf>,

    /// Date the loaded data is valid for (YYYY-MM-DD) [default: today]
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Print the report
    #[arg(short, long)]
    report: bool,

    /// SQLite database file
    #[arg(long, env = "DATABASE_NAME")]
    database: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Must run before parsing so DATABASE_NAME from .env reaches clap
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(LogWriterFactory))
        .with(filter)
        .init();

    match dotenv {
        Ok(path) => debug!("Loaded environment from {:?}", path),
        Err(e) => debug!("No .env loaded: {}", e),
    }

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "datastation", &mut std::io::stdout());
        return;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if !cli.load && !cli.report {
        eprintln!("Nothing to do: pass --load and/or --report (see --help).");
        return;
    }

    // Each operation reports its own failure and the next one still runs
    if cli.load {
        let file = cli
            .filename
            .clone()
            .unwrap_or_else(|| config.import.default_file.clone());
        let date = cli.date.unwrap_or_else(|| Local::now().date_naive());

        match cmd_load(&config, &file, date).await {
            Ok(stats) => print_load_stats(&stats),
            Err(e) => print_load_failure(&e, &file, date),
        }
    }

    if cli.report {
        match cmd_report(&config).await {
            Ok(report) => print_report(&report),
            Err(e) => print_report_failure(&e),
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;

    if let Some(database) = &cli.database {
        config.database.path = database.clone();
    }

    config.validate()?;
    Ok(config)
}

fn print_load_failure(err: &Error, file: &Path, date: NaiveDate) {
    debug!("Load failed: {:?}", err);
    eprintln!(
        "Error \"{}\" while loading data from file {} for date {}.",
        err,
        file.display(),
        date
    );
    eprintln!("  hint: {}", failure_hint(err));
}

fn print_report_failure(err: &Error) {
    debug!("Report failed: {:?}", err);
    eprintln!("Error \"{}\" while preparing the report.", err);
    eprintln!("  hint: {}", failure_hint(err));
}

fn failure_hint(err: &Error) -> &'static str {
    match err {
        Error::FileAccess { .. } => "check that the workbook exists and is readable",
        Error::Format(_) => "the workbook must contain at least one readable sheet",
        Error::Connection(_) => "check the database location (--database or DATABASE_NAME)",
        Error::Constraint(_) => "fix the offending row and load again; nothing was saved",
        Error::Config(_) => "check the configuration file",
    }
}

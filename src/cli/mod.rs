pub mod cleanup;
#[cfg(feature = "pdf")]
pub mod export;
pub mod import;
pub mod init;
pub mod parse;
pub mod report;
pub mod sample;
pub mod status;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::ingest::{self, Parsed};
use crate::models::UploadedFile;
use crate::settings::load_settings;
use crate::store::SqliteStore;

pub(crate) fn parse_path(file: &str) -> Result<Parsed> {
    let upload = UploadedFile::from_path(Path::new(file))?;
    ingest::parse_file(&upload)
}

pub(crate) fn open_store() -> Result<SqliteStore> {
    SqliteStore::open(&load_settings().db_path())
}

pub(crate) fn dated_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    dir.join(format!("{stem}-{date}.{ext}"))
}

#[derive(Parser)]
#[command(
    name = "trialbal",
    version,
    about = "Trial balance ingestion, cleanup and reporting."
)]
pub struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and record company details.
    Init {
        /// Path for trialbal data (default: ~/Documents/trialbal)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Company name printed on reports
        #[arg(long)]
        company: Option<String>,
        /// Period label printed on reports, e.g. 'Year ended 31.12.2008'
        #[arg(long)]
        period: Option<String>,
    },
    /// Parse a CSV/XLSX trial balance and print the normalized rows.
    Parse {
        /// Path to CSV or spreadsheet file
        file: String,
        /// Print rows and audit as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a file, store its rows and regenerate reports.
    Import {
        /// Path to CSV or spreadsheet file
        file: String,
    },
    /// Parse a file and write the cleaned rows back out.
    Cleanup {
        /// Path to CSV or spreadsheet file
        file: String,
        /// Output path; `.csv` writes CSV, anything else XLSX
        /// (default: <data_dir>/exports/formatted-data-YYYY-MM-DD.xlsx)
        #[arg(long)]
        output: Option<String>,
    },
    /// Print reports generated from the last import.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export reports to PDF.
    #[cfg(feature = "pdf")]
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Write a sample trial balance to explore trialbal.
    Sample {
        /// Output path; `.csv` writes CSV, anything else XLSX
        #[arg(long, default_value = "sample_trial_balance.xlsx")]
        output: String,
    },
    /// Show settings and what is currently stored.
    Status,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Profit & Loss account.
    Pnl,
    /// Balance sheet.
    Balance,
    /// Ratio inputs and derived ratios.
    Ratios,
}

#[cfg(feature = "pdf")]
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export Profit & Loss to PDF.
    Pnl {
        /// Output file path
        #[arg(long)]
        output: Option<String>,
    },
    /// Export the balance sheet to PDF.
    Balance {
        /// Output file path
        #[arg(long)]
        output: Option<String>,
    },
}

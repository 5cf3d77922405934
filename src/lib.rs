//! Trial balance ingestion: CSV and spreadsheet files in, canonical
//! `Particulars / Debit / Credit` rows plus an audit trail out, with
//! reports, cleanup export and PDF rendering layered on top.

pub mod cli;
pub mod error;
pub mod export;
pub mod fmt;
pub mod ingest;
pub mod logging;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod reports;
pub mod sample;
pub mod settings;
pub mod store;

pub use error::{Result, TrialBalError};
pub use ingest::{parse, parse_file, AuditResult, Issue, Parsed};
pub use models::{Amount, CanonicalRow, FileContent, RawRow, UploadedFile};

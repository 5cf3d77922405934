use std::path::PathBuf;

use crate::error::Result;
use crate::export::{write_rows, OutputFormat};
use crate::settings::load_settings;

use super::parse::format_audit;
use super::{dated_path, parse_path};

pub fn run(file: &str, output: Option<String>) -> Result<()> {
    let parsed = parse_path(file)?;
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| dated_path(&load_settings().exports_dir(), "formatted-data", "xlsx"));

    let format = write_rows(&parsed.rows, &path)?;
    println!("{}", format_audit(&parsed.audit));
    let kind = match format {
        OutputFormat::Csv => "CSV",
        OutputFormat::Xlsx => "workbook",
    };
    println!("Wrote {} rows as {kind} to {}", parsed.rows.len(), path.display());
    Ok(())
}

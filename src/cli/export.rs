use std::path::{Path, PathBuf};

use crate::error::{Result, TrialBalError};
use crate::settings::load_settings;
use crate::store::{load_balance_sheet, load_profit_loss};

use super::{dated_path, open_store, ExportCommands};

fn not_imported() -> TrialBalError {
    TrialBalError::Other("Nothing to export. Run `trialbal import <FILE>` first.".to_string())
}

fn write_pdf(bytes: &[u8], path: &Path) -> Result<String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    let display = path.display().to_string();
    println!("Wrote {display}");
    Ok(display)
}

fn output_path(output: Option<String>, stem: &str) -> PathBuf {
    output
        .map(PathBuf::from)
        .unwrap_or_else(|| dated_path(&load_settings().exports_dir(), stem, "pdf"))
}

/// Dispatch an export command. Returns the written path.
pub fn dispatch(cmd: ExportCommands) -> Result<String> {
    match cmd {
        ExportCommands::Pnl { output } => pnl(output),
        ExportCommands::Balance { output } => balance(output),
    }
}

pub fn pnl(output: Option<String>) -> Result<String> {
    let store = open_store()?;
    let report = load_profit_loss(&store)?.ok_or_else(not_imported)?;
    let settings = load_settings();
    let bytes = crate::pdf::render_pnl(&report, &settings.company_name, &settings.period_label)?;
    write_pdf(&bytes, &output_path(output, "pnl"))
}

pub fn balance(output: Option<String>) -> Result<String> {
    let store = open_store()?;
    let report = load_balance_sheet(&store)?.ok_or_else(not_imported)?;
    let settings = load_settings();
    let bytes =
        crate::pdf::render_balance_sheet(&report, &settings.company_name, &settings.period_label)?;
    write_pdf(&bytes, &output_path(output, "balance-sheet"))
}

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
use tracing::info;

use crate::error::Result;
use crate::models::{Amount, CanonicalRow};

pub const CLEANUP_SHEET: &str = "Formatted Data";
pub const HEADERS: [&str; 3] = ["Particulars", "Debit", "Credit"];

const NAME_WIDTH: f64 = 36.0;
const AMOUNT_WIDTH: f64 = 16.0;
const NUM_FORMAT: &str = "#,##0.00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// `.csv` (any case) selects CSV; everything else is a workbook.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Xlsx,
        }
    }
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

fn write_amount(
    ws: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    amount: &Amount,
    number: &Format,
) -> Result<()> {
    match amount {
        Amount::Number(n) => {
            ws.write_number_with_format(row, col, *n, number)?;
        }
        Amount::Text(s) => {
            ws.write_string(row, col, s)?;
        }
        Amount::Empty => {}
    }
    Ok(())
}

/// Build the cleanup workbook in memory.
pub fn xlsx_bytes(rows: &[CanonicalRow], sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new()
        .set_bold()
        .set_border_bottom(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let number = Format::new().set_num_format(NUM_FORMAT);

    let ws = workbook.add_worksheet();
    ws.set_name(sheet_name)?;
    ws.set_column_width(0, NAME_WIDTH)?;
    ws.set_column_width(1, AMOUNT_WIDTH)?;
    ws.set_column_width(2, AMOUNT_WIDTH)?;

    for (col, title) in HEADERS.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        ws.write_string(r, 0, &row.name)?;
        write_amount(ws, r, 1, &row.debit, &number)?;
        write_amount(ws, r, 2, &row.credit, &number)?;
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn write_xlsx(rows: &[CanonicalRow], path: &Path) -> Result<()> {
    write_sheet(rows, CLEANUP_SHEET, path)
}

pub(crate) fn write_sheet(rows: &[CanonicalRow], sheet_name: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xlsx_bytes(rows, sheet_name)?)?;
    info!(path = %path.display(), rows = rows.len(), "wrote workbook");
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub fn csv_string(rows: &[CanonicalRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADERS)?;
    for row in rows {
        wtr.write_record([row.name.clone(), row.debit.to_string(), row.credit.to_string()])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| crate::error::TrialBalError::Other(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| crate::error::TrialBalError::Other(e.to_string()))
}

pub fn write_csv(rows: &[CanonicalRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, csv_string(rows)?)?;
    info!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}

/// Write by extension: `.csv` or workbook.
pub fn write_rows(rows: &[CanonicalRow], path: &Path) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(path);
    match format {
        OutputFormat::Csv => write_csv(rows, path)?,
        OutputFormat::Xlsx => write_xlsx(rows, path)?,
    }
    Ok(format)
}

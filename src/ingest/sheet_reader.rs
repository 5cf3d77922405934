use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xls, XlsOptions};
use tracing::{debug, warn};

use crate::error::{Result, TrialBalError};
use crate::ingest::audit::{AuditResult, Issue};
use crate::ingest::headers::unique_headers;
use crate::models::{FileContent, RawRow};

type Workbook = Sheets<Cursor<Vec<u8>>>;

/// Windows-1252, the codepage most legacy `.xls` exports actually use.
const LENIENT_XLS_CODEPAGE: u16 = 1252;

// ---------------------------------------------------------------------------
// Opening
// ---------------------------------------------------------------------------

/// Second attempt after format sniffing failed. The auto reader has
/// already tried every format, so this only retries `.xls` with the
/// codepage pinned, for legacy files whose declared codepage is wrong.
fn open_lenient(bytes: &[u8]) -> Option<Workbook> {
    let mut options = XlsOptions::default();
    options.force_codepage = Some(LENIENT_XLS_CODEPAGE);
    Xls::new_with_options(Cursor::new(bytes.to_vec()), options)
        .ok()
        .map(Sheets::Xls)
}

pub fn open_workbook(bytes: &[u8]) -> Result<Workbook> {
    match open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())) {
        Ok(wb) => Ok(wb),
        Err(e) => {
            warn!(error = %e, "workbook did not open, retrying as xls with a fixed codepage");
            open_lenient(bytes).ok_or_else(|| TrialBalError::Workbook(e.to_string()))
        }
    }
}

/// Merged regions are only reported for `.xlsx`. calamine 0.25 does not
/// expose merges for `.xls`, `.xlsb` or `.ods`, so those count as none.
fn merged_region_count(workbook: &mut Workbook, sheet: &str) -> usize {
    match workbook {
        Sheets::Xlsx(wb) => {
            if wb.load_merged_regions().is_err() {
                return 0;
            }
            wb.merged_regions_by_sheet(sheet).len()
        }
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First row is the header; every cell comes out as text, blanks as `""`.
/// Rows with no content at all are skipped.
pub fn range_to_rows(range: &Range<Data>) -> Result<Vec<RawRow>> {
    let mut rows_iter = range.rows();
    let Some(header_cells) = rows_iter.next() else {
        return Err(TrialBalError::EmptySheet);
    };
    let raw_headers: Vec<String> = header_cells.iter().map(cell_text).collect();
    if raw_headers.iter().all(|h| h.trim().is_empty()) {
        return Err(TrialBalError::EmptySheet);
    }
    let headers = unique_headers(&raw_headers);

    let mut rows = Vec::new();
    for cells in rows_iter {
        let texts: Vec<String> = cells.iter().map(cell_text).collect();
        if texts.iter().all(|t| t.trim().is_empty()) {
            continue;
        }
        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            row.insert(header.as_str(), texts.get(i).cloned().unwrap_or_default());
        }
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Read the first sheet of a workbook into raw rows.
pub fn read(content: &FileContent, audit: &mut AuditResult) -> Result<Vec<RawRow>> {
    if content.is_empty() {
        audit.push_issue(Issue::file(
            "Failed to read file data",
            "The file might be corrupted or empty. Try re-exporting the file.",
        ));
        return Err(TrialBalError::Workbook("Failed to read file data".to_string()));
    }
    let bytes = content.to_bytes();

    let mut workbook = match open_workbook(&bytes) {
        Ok(wb) => wb,
        Err(e) => {
            audit.push_issue(Issue::file(
                "Failed to parse spreadsheet file",
                "The file may be corrupted or in an unsupported format. Try saving as .xlsx or .csv.",
            ));
            return Err(e);
        }
    };

    let sheet_names = workbook.sheet_names();
    debug!(sheets = ?sheet_names, "workbook opened");
    let Some(first_sheet) = sheet_names.first().cloned() else {
        audit.push_issue(Issue::file(
            "Spreadsheet contains no sheets",
            "The file appears to be empty. Please ensure it contains at least one sheet with data.",
        ));
        return Err(TrialBalError::NoSheets);
    };

    let merged = merged_region_count(&mut workbook, &first_sheet);
    if merged > 0 {
        audit.warn(format!("Found {merged} merged cells which may cause data misalignment"));
    }

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| TrialBalError::Workbook(format!("Failed to read sheet '{first_sheet}': {e}")))?;
    let rows = range_to_rows(&range)?;

    audit.total_rows = rows.len();
    if rows.is_empty() {
        audit.push_issue(Issue::file(
            "Spreadsheet contains no data rows",
            "Ensure your spreadsheet has data rows with headers matching Particulars, Debit, and Credit",
        ));
        return Err(TrialBalError::NoData);
    }
    debug!(rows = rows.len(), sheet = %first_sheet, "sheet converted");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Format, Workbook as XlsxWriter};

    fn build_xlsx(rows: &[&[&str]], merge_header_tail: bool) -> Vec<u8> {
        let mut wb = XlsxWriter::new();
        let ws = wb.add_worksheet();
        for (r, cells) in rows.iter().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                match value.parse::<f64>() {
                    Ok(n) => ws.write_number(r as u32, c as u16, n).unwrap(),
                    Err(_) => ws.write_string(r as u32, c as u16, *value).unwrap(),
                };
            }
        }
        if merge_header_tail {
            ws.merge_range(0, 3, 0, 4, "Notes", &Format::new()).unwrap();
        }
        wb.save_to_buffer().unwrap()
    }

    const TB: &[&[&str]] = &[
        &["Particulars", "Debit", "Credit"],
        &["Cash in Hand", "15000", ""],
        &["Cash at Bank", "85000.5", ""],
        &["Capital", "", "100000.5"],
    ];

    #[test]
    fn test_read_first_sheet_as_text() {
        let bytes = build_xlsx(TB, false);
        let mut audit = AuditResult::new();
        let rows = read(&FileContent::Bytes(bytes), &mut audit).unwrap();
        assert_eq!(audit.total_rows, 3);
        assert!(audit.warnings.is_empty());
        assert_eq!(rows[0].get("Particulars"), Some("Cash in Hand"));
        assert_eq!(rows[0].get("Debit"), Some("15000"));
        assert_eq!(rows[0].get("Credit"), Some(""));
        assert_eq!(rows[1].get("Debit"), Some("85000.5"));
    }

    #[test]
    fn test_binary_string_content_accepted() {
        let bytes = build_xlsx(TB, false);
        let legacy: String = bytes.iter().map(|b| *b as char).collect();
        let mut audit = AuditResult::new();
        let rows = read(&FileContent::BinaryString(legacy), &mut audit).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_merged_cells_warn_but_continue() {
        let bytes = build_xlsx(TB, true);
        let mut audit = AuditResult::new();
        let rows = read(&FileContent::Bytes(bytes), &mut audit).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            audit.warnings,
            vec!["Found 1 merged cells which may cause data misalignment".to_string()]
        );
    }

    #[test]
    fn test_merged_regions_counted_on_xlsx() {
        let mut wb = open_workbook(&build_xlsx(TB, true)).unwrap();
        assert!(matches!(wb, Sheets::Xlsx(_)));
        let sheet = wb.sheet_names()[0].clone();
        assert_eq!(merged_region_count(&mut wb, &sheet), 1);

        let mut plain = open_workbook(&build_xlsx(TB, false)).unwrap();
        assert_eq!(merged_region_count(&mut plain, &sheet), 0);
    }

    #[test]
    fn test_lenient_retry_only_reads_xls() {
        assert!(open_lenient(&build_xlsx(TB, false)).is_none());
        assert!(open_lenient(b"definitely not a workbook").is_none());
    }

    #[test]
    fn test_header_only_sheet_is_fatal() {
        let bytes = build_xlsx(&[&["Particulars", "Debit", "Credit"]], false);
        let mut audit = AuditResult::new();
        let err = read(&FileContent::Bytes(bytes), &mut audit).unwrap_err();
        assert!(matches!(err, TrialBalError::NoData));
    }

    #[test]
    fn test_blank_sheet_is_fatal() {
        let bytes = build_xlsx(&[], false);
        let mut audit = AuditResult::new();
        assert!(read(&FileContent::Bytes(bytes), &mut audit).is_err());
    }

    #[test]
    fn test_garbage_bytes_fail_after_retry() {
        let mut audit = AuditResult::new();
        let err = read(&FileContent::Bytes(b"definitely not a workbook".to_vec()), &mut audit).unwrap_err();
        assert!(matches!(err, TrialBalError::Workbook(_)));
        assert_eq!(audit.issues[0].issue, "Failed to parse spreadsheet file");
    }

    #[test]
    fn test_empty_content_unreadable() {
        let mut audit = AuditResult::new();
        assert!(read(&FileContent::Bytes(Vec::new()), &mut audit).is_err());
    }

    #[test]
    fn test_range_blank_rows_skipped_and_headers_deduped() {
        let bytes = build_xlsx(
            &[
                &["Particulars", "Debit", "Debit", ""],
                &["Rent", "10", "20", "x"],
                &["", "", "", ""],
                &["Sales", "", "", ""],
            ],
            false,
        );
        let mut audit = AuditResult::new();
        let rows = read(&FileContent::Bytes(bytes), &mut audit).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["Particulars", "Debit", "Debit_1", "__EMPTY"]);
        assert_eq!(rows[0].get("Debit_1"), Some("20"));
    }
}

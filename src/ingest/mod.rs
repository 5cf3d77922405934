//! Ingestion pipeline: detect → decode → normalize headers → reconcile and
//! audit → canonicalize.

pub mod audit;
pub mod columns;
pub mod csv_reader;
pub mod detect;
pub mod headers;
pub mod normalizer;
#[cfg(feature = "spreadsheet")]
pub mod sheet_reader;
pub mod validator;

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info};

use crate::error::{Result, TrialBalError};
use crate::models::{CanonicalRow, RawRow, UploadedFile};

pub use audit::{AuditResult, Issue};
pub use detect::{detect, FileKind};

/// Successful outcome of one ingestion.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub rows: Vec<CanonicalRow>,
    pub audit: AuditResult,
}

fn decode(file: &UploadedFile, audit: &mut AuditResult) -> Result<Vec<RawRow>> {
    let kind = detect(file.media_type.as_deref(), &file.name);
    debug!(file = %file.name, media_type = ?file.media_type, kind = kind.key(), "routing file");
    match kind {
        FileKind::Csv => csv_reader::read(&file.content.to_bytes(), audit),
        #[cfg(feature = "spreadsheet")]
        FileKind::Spreadsheet => sheet_reader::read(&file.content, audit),
        #[cfg(not(feature = "spreadsheet"))]
        FileKind::Spreadsheet => Err(TrialBalError::UnsupportedFormat(format!(
            "{} (built without spreadsheet support)",
            file.name
        ))),
    }
}

fn run(file: &UploadedFile, audit: &mut AuditResult) -> Result<Vec<CanonicalRow>> {
    let raw = decode(file, audit)?;
    let cleaned = headers::normalize_headers(raw);
    let columns = validator::validate(&cleaned, audit)?;
    let rows = normalizer::canonicalize(&cleaned, &columns);
    audit.finalize(rows.len());
    if rows.is_empty() {
        return Err(TrialBalError::NoValidRows);
    }
    Ok(rows)
}

/// Ingest one file. Fatal problems come back as the error; everything
/// recoverable is recorded in the returned audit.
pub fn parse_file(file: &UploadedFile) -> Result<Parsed> {
    let mut audit = AuditResult::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(file, &mut audit)))
        .unwrap_or_else(|_| Err(TrialBalError::Other(format!("Unexpected failure while parsing {}", file.name))));

    match outcome {
        Ok(rows) => {
            info!(
                file = %file.name,
                total = audit.total_rows,
                valid = audit.valid_rows,
                issues = audit.issues.len(),
                "parsed file"
            );
            Ok(Parsed { rows, audit })
        }
        Err(e) => {
            debug!(file = %file.name, error = %e, issues = ?audit.issues, "parse failed");
            Err(e)
        }
    }
}

/// Continuation-style entry point: exactly one of `on_success` /
/// `on_error` runs, exactly once.
pub fn parse<S, E>(file: &UploadedFile, on_success: S, on_error: E)
where
    S: FnOnce(Vec<CanonicalRow>, AuditResult),
    E: FnOnce(TrialBalError),
{
    match parse_file(file) {
        Ok(Parsed { rows, audit }) => on_success(rows, audit),
        Err(e) => on_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, FileContent};

    fn csv_file(content: &str) -> UploadedFile {
        UploadedFile::new("upload.csv", Some("text/csv"), FileContent::Bytes(content.as_bytes().to_vec()))
    }

    #[test]
    fn test_standard_csv_all_rows_valid() {
        let mut content = String::from("Particulars,Debit,Credit\n");
        for i in 1..=6 {
            if i % 2 == 0 {
                content.push_str(&format!("Account {i},,{}\n", i * 100));
            } else {
                content.push_str(&format!("Account {i},{},\n", i * 100));
            }
        }
        let parsed = parse_file(&csv_file(&content)).unwrap();
        assert_eq!(parsed.rows.len(), 6);
        assert_eq!(parsed.audit.valid_rows, 6);
        assert_eq!(parsed.audit.invalid_rows, 0);
        assert!(parsed.audit.issues.is_empty());
        for row in &parsed.rows {
            assert!(!row.name.trim().is_empty());
            assert!(!row.debit.is_empty() || !row.credit.is_empty());
        }
    }

    #[test]
    fn test_variant_headers_match_standard() {
        let standard = parse_file(&csv_file("Particulars,Debit,Credit\nRent,100,\nSales,,250\n")).unwrap();
        let variant = parse_file(&csv_file(" Account ,DR, cr \nRent,100,\nSales,,250\n")).unwrap();
        assert_eq!(standard.rows, variant.rows);
    }

    #[test]
    fn test_non_numeric_debit_in_row_five() {
        let mut content = String::from("Particulars,Debit,Credit\n");
        for i in 1..=10 {
            if i == 5 {
                content.push_str("Suspense,abc,75\n");
            } else {
                content.push_str(&format!("Account {i},{},\n", i * 10));
            }
        }
        let parsed = parse_file(&csv_file(&content)).unwrap();
        let audit = &parsed.audit;
        assert_eq!(audit.total_rows, 10);
        let issue = audit.issues_for_row(5).next().unwrap();
        assert_eq!(issue.issue, "Non-numeric Debit value: \"abc\"");
        assert_eq!(audit.valid_rows + audit.invalid_rows, 10);
        let row5 = parsed.rows.iter().find(|r| r.name == "Suspense").unwrap();
        assert_eq!(row5.credit, Amount::Number(75.0));
    }

    #[test]
    fn test_non_numeric_only_amount_drops_row() {
        let parsed = parse_file(&csv_file("Particulars,Debit,Credit\nCash,100,\nSuspense,abc,\n")).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.audit.valid_rows, 1);
        assert_eq!(parsed.audit.invalid_rows, 1);
    }

    #[test]
    fn test_missing_credit_column() {
        let err = parse_file(&csv_file("Particulars,Debit\nCash,100\n")).unwrap_err();
        assert!(err.to_string().starts_with("Missing required columns: Credit"));
    }

    #[test]
    fn test_header_only_fails() {
        assert!(parse_file(&csv_file("Particulars,Debit,Credit\n")).is_err());
    }

    #[test]
    fn test_amount_type_and_sign_fallbacks() {
        let typed = parse_file(&csv_file("Particulars,Amount,Type\nPurchases,500,Dr\n")).unwrap();
        assert_eq!(typed.rows[0].debit, Amount::Number(500.0));
        assert_eq!(typed.rows[0].credit, Amount::Empty);

        let signed = parse_file(&csv_file("Particulars,Amount\nCapital,-300\n")).unwrap();
        assert_eq!(signed.rows[0].debit, Amount::Empty);
        assert_eq!(signed.rows[0].credit, Amount::Number(300.0));
    }

    #[test]
    fn test_continuations_called_once() {
        let mut successes = 0;
        let mut failures = 0;
        parse(
            &csv_file("Particulars,Debit,Credit\nCash,1,\n"),
            |rows, audit| {
                successes += 1;
                assert_eq!(rows.len(), 1);
                assert_eq!(audit.valid_rows, 1);
            },
            |_| failures += 1,
        );
        assert_eq!((successes, failures), (1, 0));
    }

    #[test]
    fn test_error_continuation_on_failure() {
        let mut message = None;
        parse(
            &csv_file("Particulars,Debit,Credit\n"),
            |_, _| panic!("should not succeed"),
            |e| message = Some(e.to_string()),
        );
        assert_eq!(message.as_deref(), Some("File contains no data or is not in the expected format"));
    }

    #[test]
    fn test_octet_stream_csv_name_routes_to_csv() {
        let file = UploadedFile::new(
            "tb.CSV",
            Some("application/octet-stream"),
            FileContent::Bytes(b"Particulars,Debit,Credit\nCash,1,\n".to_vec()),
        );
        assert_eq!(parse_file(&file).unwrap().rows.len(), 1);
    }

    #[cfg(feature = "spreadsheet")]
    #[test]
    fn test_spreadsheet_with_merged_cells() {
        use rust_xlsxwriter::{Format, Workbook};

        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "Particulars").unwrap();
        ws.write_string(0, 1, "Debit").unwrap();
        ws.write_string(0, 2, "Credit").unwrap();
        ws.merge_range(0, 3, 0, 4, "Remarks", &Format::new()).unwrap();
        for i in 1..=5u32 {
            ws.write_string(i, 0, format!("Account {i}")).unwrap();
            ws.write_number(i, 1, f64::from(i) * 10.0).unwrap();
        }
        let bytes = wb.save_to_buffer().unwrap();
        let file = UploadedFile::new(
            "tb.xlsx",
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            FileContent::Bytes(bytes),
        );
        let parsed = parse_file(&file).unwrap();
        assert_eq!(parsed.rows.len(), 5);
        let merged: Vec<_> = parsed
            .audit
            .warnings
            .iter()
            .filter(|w| w.contains("merged cells"))
            .collect();
        assert_eq!(merged.len(), 1);
    }
}

use crate::models::CSV_MIME;

/// Which decoder a file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    /// Anything that is not CSV: `.xlsx`, `.xls`, `.ods`, and files the host
    /// labels with a generic type such as `application/octet-stream`.
    Spreadsheet,
}

impl FileKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

pub fn detect(media_type: Option<&str>, name: &str) -> FileKind {
    let is_csv_type = media_type
        .map(|t| t.split(';').next().unwrap_or("").trim())
        .map_or(false, |t| t.eq_ignore_ascii_case(CSV_MIME));
    if is_csv_type || name.to_ascii_lowercase().ends_with(".csv") {
        FileKind::Csv
    } else {
        FileKind::Spreadsheet
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrialBalError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV parsing failed: {0}")]
    CsvParse(String),

    #[error("Failed to parse spreadsheet: {0}")]
    Workbook(String),

    #[error("Spreadsheet contains no sheets")]
    NoSheets,

    #[error("Spreadsheet sheet has no header columns")]
    EmptySheet,

    #[error("File contains no data or is not in the expected format")]
    NoData,

    #[error("Missing required columns: {}. Required format is: Particulars, Debit, Credit", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No valid financial entries found. Each entry must have Particulars and either Debit or Credit value.")]
    NoValidRows,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TrialBalError>;

use tracing::{debug, warn};

use crate::error::{Result, TrialBalError};
use crate::ingest::audit::{AuditResult, Issue};
use crate::ingest::headers::unique_headers;
use crate::models::RawRow;

const DELIMITERS: &[u8] = &[b',', b';', b'\t', b'|'];
const SNIFF_LINES: usize = 10;

// ---------------------------------------------------------------------------
// Error classes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvErrorKind {
    QuoteNotClosed,
    MissingQuotes,
    UndetectableDelimiter,
    TooFewFields,
    TooManyFields,
    InvalidRecord,
}

impl CsvErrorKind {
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::QuoteNotClosed => {
                "There is an unclosed quote in your CSV. Check for missing closing quotes."
            }
            Self::MissingQuotes => {
                "Some fields are missing quotes. Ensure text fields with commas are properly quoted."
            }
            Self::UndetectableDelimiter => {
                "The delimiter could not be detected. Ensure the file uses a standard delimiter like comma (,) or semicolon (;)."
            }
            Self::TooFewFields | Self::TooManyFields => {
                "Inconsistent number of columns. Check for missing commas or extra commas in some rows."
            }
            Self::InvalidRecord => {
                "Check the CSV format and ensure it follows standard CSV formatting rules."
            }
        }
    }
}

/// A structural problem the decoder recovered from.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvError {
    pub kind: CsvErrorKind,
    /// 1-based data row, when the error belongs to one.
    pub row: Option<usize>,
    pub message: String,
}

impl CsvError {
    fn new(kind: CsvErrorKind, row: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            row,
            message: message.into(),
        }
    }
}

pub struct DecodedCsv {
    pub rows: Vec<RawRow>,
    pub errors: Vec<CsvError>,
    /// Set when the bytes were not UTF-8 and were read as Windows-1252.
    pub legacy_encoding: bool,
}

/// UTF-8 when valid, otherwise Windows-1252 (the usual encoding of CSV
/// exported by Excel). The flag reports whether the fallback was used.
fn decode_text(bytes: &[u8]) -> (String, bool) {
    let (text, legacy) = match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), false),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            (decoded.into_owned(), true)
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => (rest.to_string(), legacy),
        None => (text, legacy),
    }
}

// ---------------------------------------------------------------------------
// Delimiter sniffing
// ---------------------------------------------------------------------------

fn field_count(line: &str, delim: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(1)
}

/// Pick the delimiter whose field count is above one and most consistent
/// across the first lines. `None` when no candidate splits the header.
pub fn sniff_delimiter(text: &str) -> Option<u8> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let first = lines.first()?;

    let mut best: Option<(u8, usize)> = None;
    for &delim in DELIMITERS {
        let expected = field_count(first, delim);
        if expected <= 1 {
            continue;
        }
        let mismatches = lines
            .iter()
            .filter(|l| field_count(l, delim) != expected)
            .count();
        match best {
            Some((_, m)) if m <= mismatches => {}
            _ => best = Some((delim, mismatches)),
        }
    }
    best.map(|(d, _)| d)
}

// ---------------------------------------------------------------------------
// Quote scanning
// ---------------------------------------------------------------------------

/// Walk the text the way an RFC 4180 reader would and report quoting
/// problems by record. Record 0 is the header, so record N is data row N.
fn scan_quotes(text: &str, delim: char) -> Vec<CsvError> {
    let mut errors = Vec::new();
    let mut record = 0usize;
    let mut record_has_content = false;
    let mut field_start = true;
    let mut in_quotes = false;
    let mut after_close = false;
    let mut open_record = 0usize;
    let mut stray_reported = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                    after_close = true;
                }
            }
            continue;
        }
        match c {
            '"' if field_start => {
                in_quotes = true;
                field_start = false;
                record_has_content = true;
                open_record = record;
            }
            '\n' => {
                if record_has_content {
                    record += 1;
                }
                record_has_content = false;
                field_start = true;
                after_close = false;
                stray_reported = false;
            }
            '\r' => {}
            c if c == delim => {
                field_start = true;
                after_close = false;
                record_has_content = true;
            }
            _ => {
                record_has_content = true;
                field_start = false;
                let stray = c == '"' || after_close;
                if stray && !stray_reported {
                    stray_reported = true;
                    errors.push(CsvError::new(
                        CsvErrorKind::MissingQuotes,
                        (record > 0).then_some(record),
                        "Quote in an unquoted field or text after a closing quote",
                    ));
                }
            }
        }
    }

    if in_quotes {
        errors.push(CsvError::new(
            CsvErrorKind::QuoteNotClosed,
            (open_record > 0).then_some(open_record),
            "Quoted field unterminated",
        ));
    }
    errors
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode CSV bytes into rows keyed by the header, collecting every
/// structural problem instead of stopping at the first one.
pub fn decode(bytes: &[u8]) -> Result<DecodedCsv> {
    let (text, legacy_encoding) = decode_text(bytes);
    let text = text.as_str();

    let mut errors = Vec::new();
    let delim = match sniff_delimiter(text) {
        Some(d) => d,
        None => {
            errors.push(CsvError::new(
                CsvErrorKind::UndetectableDelimiter,
                None,
                "Unable to auto-detect delimiting character; defaulted to ','",
            ));
            b','
        }
    };
    let shown = (delim as char).escape_default().to_string();
    debug!(delimiter = %shown, "sniffed CSV delimiter");
    errors.extend(scan_quotes(text, delim as char));

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if raw_headers.is_empty() {
        return Ok(DecodedCsv {
            rows: Vec::new(),
            errors,
            legacy_encoding,
        });
    }
    let headers = unique_headers(&raw_headers);

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row_no = idx + 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(CsvError::new(CsvErrorKind::InvalidRecord, Some(row_no), e.to_string()));
                continue;
            }
        };

        if record.len() < headers.len() {
            errors.push(CsvError::new(
                CsvErrorKind::TooFewFields,
                Some(row_no),
                format!("Too few fields: expected {} fields but parsed {}", headers.len(), record.len()),
            ));
        } else if record.len() > headers.len() {
            errors.push(CsvError::new(
                CsvErrorKind::TooManyFields,
                Some(row_no),
                format!("Too many fields: expected {} fields but parsed {}", headers.len(), record.len()),
            ));
        }

        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            row.insert(header.as_str(), record.get(i).unwrap_or(""));
        }
        for (extra, value) in record.iter().skip(headers.len()).enumerate() {
            row.insert(format!("__EXTRA_{extra}"), value);
        }
        rows.push(row);
    }

    Ok(DecodedCsv {
        rows,
        errors,
        legacy_encoding,
    })
}

/// Decode a CSV upload and apply the partial-failure policy: keep whatever
/// rows were recovered, record each error in the audit, and fail only when
/// nothing usable came out.
pub fn read(bytes: &[u8], audit: &mut AuditResult) -> Result<Vec<RawRow>> {
    let decoded = decode(bytes)?;
    audit.total_rows = decoded.rows.len();

    if decoded.legacy_encoding {
        warn!("CSV is not valid UTF-8, decoded as Windows-1252");
        audit.warn("File is not valid UTF-8; decoded as Windows-1252");
    }

    if !decoded.errors.is_empty() {
        warn!(errors = decoded.errors.len(), rows = decoded.rows.len(), "CSV decoded with errors");
        for e in &decoded.errors {
            audit.push_issue(Issue {
                row: e.row,
                issue: format!("CSV parsing error: {}", e.message),
                suggestion: Some(e.kind.suggestion().to_string()),
            });
        }
        if decoded.rows.is_empty() {
            return Err(TrialBalError::CsvParse(decoded.errors[0].message.clone()));
        }
        audit.warn(format!(
            "Encountered {} CSV parsing errors but continuing with {} valid rows",
            decoded.errors.len(),
            decoded.rows.len()
        ));
    }

    if decoded.rows.is_empty() {
        audit.push_issue(Issue::file(
            "CSV file contains no data rows",
            "Ensure your file has data rows below a header of Particulars, Debit and Credit",
        ));
        return Err(TrialBalError::NoData);
    }
    Ok(decoded.rows)
}

use tracing::debug;

use crate::error::{Result, TrialBalError};
use crate::ingest::audit::{AuditResult, Issue};
use crate::ingest::columns::{resolve_columns, resolve_row, suggest_alternatives, ColumnMap};
use crate::models::RawRow;

/// Bind columns for the file and audit every row without changing it.
///
/// Returns the column binding when at least one row is usable. Fails when
/// there is no data, when roles are missing and no row can be salvaged by
/// the amount/type fallback, or when no row survives at all.
pub fn validate(rows: &[RawRow], audit: &mut AuditResult) -> Result<ColumnMap> {
    let Some(first) = rows.first() else {
        audit.push_issue(Issue::file(
            "File contains no data or is not in the expected format",
            "Ensure the file contains data rows with proper headers",
        ));
        return Err(TrialBalError::NoData);
    };

    let headers: Vec<&str> = first.keys().collect();
    let columns = resolve_columns(headers.iter().copied());
    debug!(?headers, ?columns, "resolved columns");

    let missing = columns.missing();
    if !missing.is_empty() {
        let labels: Vec<String> = missing.iter().map(|r| r.label().to_string()).collect();
        audit.push_issue(Issue::file(
            format!("Missing required columns: {}", labels.join(", ")),
            "Make sure your file has headers for Particulars, Debit, and Credit (case-insensitive)",
        ));
        let alternatives = suggest_alternatives(&headers, &columns, &missing);
        if !alternatives.is_empty() {
            audit.warn(format!("Found possible alternative headers: {}", alternatives.join(", ")));
        }
        let salvageable = rows.iter().any(|row| {
            let res = resolve_row(row, &columns);
            res.used_fallback() && res.is_usable()
        });
        if !salvageable {
            return Err(TrialBalError::MissingColumns(labels));
        }
        debug!("missing columns recovered through amount/type fallback");
    }

    let mut usable = 0usize;
    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 1;
        let res = resolve_row(row, &columns);

        if res.name.is_none() {
            audit.push_issue(Issue::at_row(
                row_no,
                "Missing Particulars value",
                "Each row must have an account name in the Particulars column",
            ));
        }

        if let Some(indicator) = res.unrecognized_type {
            audit.push_issue(Issue::at_row(
                row_no,
                format!("Unrecognized Dr/Cr indicator: \"{indicator}\""),
                "Use Dr/Debit or Cr/Credit in the type column",
            ));
        } else if let Some(amount) = res.non_numeric_amount {
            audit.push_issue(Issue::at_row(
                row_no,
                format!("Non-numeric Amount value: \"{amount}\""),
                "Amount values must be numeric",
            ));
        } else if res.debit.is_none() && res.credit.is_none() {
            audit.push_issue(Issue::at_row(
                row_no,
                "Missing both Debit and Credit values",
                "Each row must have either a Debit or Credit value (or both)",
            ));
        }

        if let Some(debit) = res.debit.filter(|a| !a.is_numeric()) {
            audit.push_issue(Issue::at_row(
                row_no,
                format!("Non-numeric Debit value: \"{}\"", debit.text()),
                "Debit values must be numeric",
            ));
        }
        if let Some(credit) = res.credit.filter(|a| !a.is_numeric()) {
            audit.push_issue(Issue::at_row(
                row_no,
                format!("Non-numeric Credit value: \"{}\"", credit.text()),
                "Credit values must be numeric",
            ));
        }

        if res.is_usable() {
            usable += 1;
        }
    }

    debug!(rows = rows.len(), usable, issues = audit.issues.len(), "validated rows");
    if usable == 0 {
        return Err(TrialBalError::NoValidRows);
    }
    Ok(columns)
}

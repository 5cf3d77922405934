use std::fmt;

use serde::{Deserialize, Serialize};

/// One problem found while ingesting a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// 1-based data row (the header is not counted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub issue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn file(issue: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            row: None,
            issue: issue.into(),
            suggestion: Some(suggestion.into()),
        }
    }

    pub fn at_row(row: usize, issue: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            issue: issue.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "Row {row}: {}", self.issue)?,
            None => write!(f, "{}", self.issue)?,
        }
        if let Some(s) = &self.suggestion {
            write!(f, " ({s})")?;
        }
        Ok(())
    }
}

/// Per-invocation ingestion report, filled in by every pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub issues: Vec<Issue>,
    pub warnings: Vec<String>,
}

impl AuditResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record how many rows survived canonicalization.
    pub fn finalize(&mut self, valid_rows: usize) {
        self.valid_rows = valid_rows;
        self.invalid_rows = self.total_rows.saturating_sub(valid_rows);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty()
    }

    /// Issues attached to a given data row.
    pub fn issues_for_row(&self, row: usize) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.row == Some(row))
    }
}

impl fmt::Display for AuditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} rows read, {} valid, {} invalid",
            self.total_rows, self.valid_rows, self.invalid_rows
        )?;
        if !self.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for w in &self.warnings {
                writeln!(f, "  - {w}")?;
            }
        }
        if !self.issues.is_empty() {
            writeln!(f, "Issues:")?;
            for i in &self.issues {
                writeln!(f, "  - {i}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_balances_counts() {
        let mut audit = AuditResult::new();
        audit.total_rows = 10;
        audit.finalize(7);
        assert_eq!(audit.valid_rows, 7);
        assert_eq!(audit.invalid_rows, 3);
        assert_eq!(audit.valid_rows + audit.invalid_rows, audit.total_rows);
    }

    #[test]
    fn test_json_uses_camel_case_and_omits_absent_fields() {
        let mut audit = AuditResult::new();
        audit.total_rows = 1;
        audit.push_issue(Issue {
            row: None,
            issue: "Bad".to_string(),
            suggestion: None,
        });
        let json = serde_json::to_value(&audit).unwrap();
        assert_eq!(json["totalRows"], 1);
        assert_eq!(json["issues"][0], serde_json::json!({"issue": "Bad"}));
    }

    #[test]
    fn test_display_lists_warnings_and_issues() {
        let mut audit = AuditResult::new();
        audit.total_rows = 2;
        audit.finalize(1);
        audit.warn("Found 1 merged cells which may cause data misalignment");
        audit.push_issue(Issue::at_row(2, "Missing Particulars value", "Add a name"));
        let text = audit.to_string();
        assert!(text.starts_with("2 rows read, 1 valid, 1 invalid"));
        assert!(text.contains("merged cells"));
        assert!(text.contains("Row 2: Missing Particulars value (Add a name)"));
    }
}

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};
use serde::Serialize;

use crate::error::Result;
use crate::fmt::amount_cell;
use crate::ingest::AuditResult;
use crate::models::CanonicalRow;

use super::parse_path;

#[derive(Serialize)]
struct ParseOutput<'a> {
    data: &'a [CanonicalRow],
    audit: &'a AuditResult,
}

pub fn rows_table(rows: &[CanonicalRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Particulars", "Debit", "Credit"]);
    for (i, row) in rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&row.name),
            Cell::new(amount_cell(&row.debit)).set_alignment(CellAlignment::Right),
            Cell::new(amount_cell(&row.credit)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Colored audit summary for terminal output.
pub fn format_audit(audit: &AuditResult) -> String {
    let mut out = format!(
        "{} rows read, {} valid, {} invalid",
        audit.total_rows,
        audit.valid_rows.to_string().green(),
        if audit.invalid_rows > 0 {
            audit.invalid_rows.to_string().red()
        } else {
            audit.invalid_rows.to_string().normal()
        }
    );
    for w in &audit.warnings {
        out.push_str(&format!("\n{} {w}", "warning:".yellow().bold()));
    }
    for issue in &audit.issues {
        out.push_str(&format!("\n{} {issue}", "issue:".red().bold()));
    }
    out
}

pub fn run(file: &str, json: bool) -> Result<()> {
    let parsed = parse_path(file)?;
    if json {
        let out = ParseOutput {
            data: &parsed.rows,
            audit: &parsed.audit,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!("{}", rows_table(&parsed.rows));
    println!("{}", format_audit(&parsed.audit));
    Ok(())
}

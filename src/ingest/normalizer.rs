use crate::ingest::columns::{resolve_row, ColumnMap};
use crate::models::{Amount, CanonicalRow, RawRow};

/// Canonical form of one row, or `None` when the row has no name or no
/// numeric amount. The input row is never modified.
pub fn canonicalize_row(row: &RawRow, columns: &ColumnMap) -> Option<CanonicalRow> {
    let res = resolve_row(row, columns);
    if !res.is_usable() {
        return None;
    }
    Some(CanonicalRow {
        name: res.name?.to_string(),
        debit: res.debit.map_or(Amount::Empty, |a| a.to_amount()),
        credit: res.credit.map_or(Amount::Empty, |a| a.to_amount()),
    })
}

/// Canonicalize every usable row, preserving input order. Repeated account
/// names stay separate entries.
pub fn canonicalize(rows: &[RawRow], columns: &ColumnMap) -> Vec<CanonicalRow> {
    rows.iter()
        .filter_map(|row| canonicalize_row(row, columns))
        .collect()
}

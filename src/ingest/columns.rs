//! Column reconciliation.
//!
//! Roles are bound once per file from the header set using exact synonyms.
//! A second, substring-based table only feeds diagnostic warnings and never
//! binds a column. The amount/type fallback is the one decision taken per
//! row, because the type indicator is itself row data.

use crate::models::{Amount, RawRow};

/// Logical role a physical column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Name,
    Debit,
    Credit,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Name, Role::Debit, Role::Credit];

    /// Canonical column label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Particulars",
            Self::Debit => "Debit",
            Self::Credit => "Credit",
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Exact (case-insensitive) header spellings that bind a role.
const SYNONYMS: &[(Role, &[&str])] = &[
    (
        Role::Name,
        &["particulars", "account", "description", "item", "account name", "account description"],
    ),
    (Role::Debit, &["debit", "dr", "debit amount", "amount (dr)"]),
    (Role::Credit, &["credit", "cr", "credit amount", "amount (cr)"]),
];

/// Substrings that hint a header might be meant for a role. Diagnostic only.
const HINTS: &[(Role, &[&str])] = &[
    (Role::Name, &["account", "item", "description", "particular"]),
    (Role::Debit, &["dr", "debt", "payment", "expense"]),
    (Role::Credit, &["cr", "cred", "receipt", "income"]),
];

/// Headers that carry a debit/credit indicator for a single amount column.
const TYPE_HEADERS: &[&str] = &["type", "dc", "dr/cr"];

fn synonyms(role: Role) -> &'static [&'static str] {
    SYNONYMS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, s)| *s)
        .unwrap_or(&[])
}

fn hints(role: Role) -> &'static [&'static str] {
    HINTS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, s)| *s)
        .unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Amount parsing
// ---------------------------------------------------------------------------

/// Parse an amount cell. Thousands separators, quotes and `$` are ignored and
/// `(x)` reads as `-x`. Blank, non-numeric and non-finite text is `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    let (negative, body) = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };
    if body.is_empty() {
        return None;
    }
    let value: f64 = body.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

// ---------------------------------------------------------------------------
// File-level binding
// ---------------------------------------------------------------------------

/// Physical headers bound to each role for one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    pub name: Option<String>,
    pub debit: Option<String>,
    pub credit: Option<String>,
    /// First unbound header containing "amount" (and neither "cr" nor "dr").
    pub amount: Option<String>,
    /// How many headers qualified as an amount column.
    pub amount_candidates: usize,
    pub type_indicator: Option<String>,
}

impl ColumnMap {
    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Name => self.name.as_deref(),
            Role::Debit => self.debit.as_deref(),
            Role::Credit => self.credit.as_deref(),
        }
    }

    fn slot(&mut self, role: Role) -> &mut Option<String> {
        match role {
            Role::Name => &mut self.name,
            Role::Debit => &mut self.debit,
            Role::Credit => &mut self.credit,
        }
    }

    pub fn missing(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|r| self.get(*r).is_none())
            .collect()
    }

    fn is_bound(&self, header: &str) -> bool {
        Role::ALL.iter().any(|r| self.get(*r) == Some(header))
    }
}

/// Bind roles from a header set. The first header (in column order) matching
/// a role's synonyms wins, and a header binds at most one role.
pub fn resolve_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> ColumnMap {
    let headers: Vec<&str> = headers.into_iter().collect();
    let mut map = ColumnMap::default();

    for header in &headers {
        let lower = header.trim().to_lowercase();
        for role in Role::ALL {
            if map.get(role).is_none() && synonyms(role).contains(&lower.as_str()) {
                *map.slot(role) = Some(header.to_string());
                break;
            }
        }
    }

    for header in &headers {
        let lower = header.trim().to_lowercase();
        if map.type_indicator.is_none() && TYPE_HEADERS.contains(&lower.as_str()) {
            map.type_indicator = Some(header.to_string());
            continue;
        }
        if map.is_bound(header) {
            continue;
        }
        if lower.contains("amount") && !lower.contains("cr") && !lower.contains("dr") {
            map.amount_candidates += 1;
            if map.amount.is_none() {
                map.amount = Some(header.to_string());
            }
        }
    }
    map
}

/// Headers that look like they were meant for a missing role, formatted for
/// the audit warning. Bound headers are never suggested.
pub fn suggest_alternatives(headers: &[&str], columns: &ColumnMap, missing: &[Role]) -> Vec<String> {
    let mut out = Vec::new();
    for role in missing {
        for header in headers {
            if columns.is_bound(header) {
                continue;
            }
            let lower = header.to_lowercase();
            if hints(*role).iter().any(|h| lower.contains(h)) {
                out.push(format!("{header} (possible match for {})", role.label()));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Per-row resolution
// ---------------------------------------------------------------------------

/// Where a row's amounts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    Columns,
    TypeIndicator,
    Sign,
    None,
}

/// An amount as resolved for a row: either a cell's text or a value already
/// derived by the sign fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedAmount<'a> {
    Cell(&'a str),
    Value(f64),
}

impl ResolvedAmount<'_> {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Cell(s) => parse_amount(s),
            Self::Value(v) => Some(*v),
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.value().is_some()
    }

    pub fn text(&self) -> String {
        match self {
            Self::Cell(s) => s.trim().to_string(),
            Self::Value(v) => v.to_string(),
        }
    }

    /// Numeric when parseable, otherwise the original text.
    pub fn to_amount(&self) -> Amount {
        match self.value() {
            Some(v) => Amount::Number(v),
            None => Amount::Text(self.text()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowResolution<'a> {
    pub name: Option<&'a str>,
    pub debit: Option<ResolvedAmount<'a>>,
    pub credit: Option<ResolvedAmount<'a>>,
    pub source: AmountSource,
    /// Type-indicator text that named neither side.
    pub unrecognized_type: Option<&'a str>,
    /// Sign-fallback amount that did not parse as a number.
    pub non_numeric_amount: Option<&'a str>,
}

impl RowResolution<'_> {
    /// A name plus at least one numeric amount.
    pub fn is_usable(&self) -> bool {
        self.name.is_some()
            && (self.debit.map_or(false, |a| a.is_numeric())
                || self.credit.map_or(false, |a| a.is_numeric()))
    }

    pub fn used_fallback(&self) -> bool {
        matches!(self.source, AmountSource::TypeIndicator | AmountSource::Sign)
    }
}

fn cell<'a>(row: &'a RawRow, header: Option<&str>) -> Option<&'a str> {
    header
        .and_then(|h| row.get(h))
        .filter(|v| !v.trim().is_empty())
}

/// Resolve one row against the file's column binding. Strict columns win
/// whenever the row carries a value in either of them; the amount/type
/// fallback only runs for rows that have a name and no strict amount.
pub fn resolve_row<'a>(row: &'a RawRow, columns: &ColumnMap) -> RowResolution<'a> {
    let name = cell(row, columns.name.as_deref()).map(str::trim);
    let debit = cell(row, columns.debit.as_deref());
    let credit = cell(row, columns.credit.as_deref());

    let mut res = RowResolution {
        name,
        debit: debit.map(ResolvedAmount::Cell),
        credit: credit.map(ResolvedAmount::Cell),
        source: AmountSource::None,
        unrecognized_type: None,
        non_numeric_amount: None,
    };
    if debit.is_some() || credit.is_some() {
        res.source = AmountSource::Columns;
        return res;
    }
    if name.is_none() {
        return res;
    }
    let Some(amount) = cell(row, columns.amount.as_deref()) else {
        return res;
    };

    if let Some(type_header) = columns.type_indicator.as_deref() {
        let indicator = row.get(type_header).unwrap_or("").trim();
        let lower = indicator.to_lowercase();
        if lower.contains("dr") || lower.contains("debit") {
            res.debit = Some(ResolvedAmount::Cell(amount));
            res.source = AmountSource::TypeIndicator;
        } else if lower.contains("cr") || lower.contains("credit") {
            res.credit = Some(ResolvedAmount::Cell(amount));
            res.source = AmountSource::TypeIndicator;
        } else {
            res.unrecognized_type = Some(indicator);
        }
        return res;
    }

    if columns.amount_candidates == 1 {
        match parse_amount(amount) {
            Some(value) if value < 0.0 => res.credit = Some(ResolvedAmount::Value(-value)),
            Some(value) => res.debit = Some(ResolvedAmount::Value(value)),
            None => {
                res.non_numeric_amount = Some(amount);
                return res;
            }
        }
        res.source = AmountSource::Sign;
    }
    res
}

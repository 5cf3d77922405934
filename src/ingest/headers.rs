use crate::models::RawRow;

/// Trim leading and trailing whitespace from every key of every row.
/// Values and row order are untouched, and so is case.
pub fn normalize_headers(rows: Vec<RawRow>) -> Vec<RawRow> {
    rows.into_iter()
        .map(|row| row.iter().map(|(k, v)| (k.trim().to_string(), v.to_string())).collect())
        .collect()
}

/// Make a header row usable as map keys: blank headers become `__EMPTY`,
/// `__EMPTY_1`, ... and repeated headers get `_1`, `_2`, ... suffixes.
pub fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for header in raw {
        let base = if header.trim().is_empty() {
            "__EMPTY".to_string()
        } else {
            header.clone()
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        out.push(candidate);
    }
    out
}

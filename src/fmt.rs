use crate::models::Amount;

fn group_thousands(int_part: &str) -> String {
    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// Format a float with thousands separators and two decimals: 1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let fixed = format!("{:.2}", val.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = group_thousands(int_part);
    if negative && fixed != "0.00" {
        format!("-{grouped}.{dec_part}")
    } else {
        format!("{grouped}.{dec_part}")
    }
}

/// Cell text for a canonical amount: numbers formatted, text verbatim,
/// empty as blank.
pub fn amount_cell(amount: &Amount) -> String {
    match amount {
        Amount::Number(n) => money(*n),
        Amount::Text(s) => s.clone(),
        Amount::Empty => String::new(),
    }
}

pub fn ratio(val: Option<f64>) -> String {
    val.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

pub fn percent(val: Option<f64>) -> String {
    val.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}%"))
}

pub fn format_bytes(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{size} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

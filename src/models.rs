use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Canonical CSV MIME type.
pub const CSV_MIME: &str = "text/csv";

// ---------------------------------------------------------------------------
// Uploaded file
// ---------------------------------------------------------------------------

/// Raw content of an uploaded file.
///
/// `BinaryString` is the legacy form some older spreadsheet readers hand out:
/// one `char` per byte, code points 0..=255.
#[derive(Debug, Clone)]
pub enum FileContent {
    Bytes(Vec<u8>),
    BinaryString(String),
}

impl FileContent {
    /// Byte view of the content. Characters above U+00FF in a binary string
    /// cannot come from a byte and are truncated to their low byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Bytes(b) => b.clone(),
            Self::BinaryString(s) => s.chars().map(|c| (c as u32 & 0xFF) as u8).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bytes(b) => b.is_empty(),
            Self::BinaryString(s) => s.is_empty(),
        }
    }
}

/// A file handed to the ingestion pipeline: its declared name and media type
/// plus the content itself.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub media_type: Option<String>,
    pub content: FileContent,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, media_type: Option<&str>, content: FileContent) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            content,
        }
    }

    /// Read a file from disk, guessing its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        let media_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());
        Ok(Self {
            name,
            media_type,
            content: FileContent::Bytes(data),
        })
    }
}

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// One decoded row: header → cell text, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position and takes the
    /// new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

// ---------------------------------------------------------------------------
// Canonical rows
// ---------------------------------------------------------------------------

/// A debit or credit cell after canonicalization.
///
/// On the wire this is a JSON number, a JSON string (the original text of a
/// value that could not be parsed), or `""` when absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Number(f64),
    Text(String),
    Empty,
}

impl Amount {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Numeric value, treating text and empty cells as zero.
    pub fn value_or_zero(&self) -> f64 {
        self.as_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Empty => Ok(()),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Empty => serializer.serialize_str(""),
        }
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Amount, E> {
        Ok(Amount::Number(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Amount, E> {
        Ok(Amount::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Amount, E> {
        Ok(Amount::Number(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Amount, E> {
        if v.is_empty() {
            Ok(Amount::Empty)
        } else {
            Ok(Amount::Text(v.to_string()))
        }
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Amount, E> {
        Ok(Amount::Empty)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// The normalized three-field record the pipeline emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    #[serde(rename = "Particulars")]
    pub name: String,
    #[serde(rename = "Debit")]
    pub debit: Amount,
    #[serde(rename = "Credit")]
    pub credit: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_row_insert_overwrites_in_place() {
        let mut row = RawRow::new();
        row.insert("A", "1");
        row.insert("B", "2");
        row.insert("A", "3");
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(row.get("A"), Some("3"));
    }

    #[test]
    fn test_binary_string_to_bytes() {
        let content = FileContent::BinaryString("PK\u{3}\u{4}\u{ff}".to_string());
        assert_eq!(content.to_bytes(), vec![b'P', b'K', 3, 4, 0xFF]);
    }

    #[test]
    fn test_canonical_row_wire_shape() {
        let row = CanonicalRow {
            name: "Cash at Bank".to_string(),
            debit: Amount::Number(85000.0),
            credit: Amount::Empty,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Particulars": "Cash at Bank", "Debit": 85000.0, "Credit": ""})
        );
    }

    #[test]
    fn test_canonical_rows_survive_wire_json() {
        let rows = vec![
            CanonicalRow {
                name: "Sales".to_string(),
                debit: Amount::Empty,
                credit: Amount::Number(785000.0),
            },
            CanonicalRow {
                name: "Rent".to_string(),
                debit: Amount::Number(12000.5),
                credit: Amount::Text("n/a".to_string()),
            },
        ];
        let json = serde_json::to_string(&rows).unwrap();
        let back: Vec<CanonicalRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_amount_deserializes_integer_json() {
        let row: CanonicalRow =
            serde_json::from_str(r#"{"Particulars":"Capital","Debit":"","Credit":500000}"#).unwrap();
        assert_eq!(row.credit, Amount::Number(500000.0));
        assert!(row.debit.is_empty());
    }
}

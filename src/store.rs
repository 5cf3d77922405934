use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::models::CanonicalRow;
use crate::reports::{BalanceSheet, ProfitLoss, RatioInputs};

pub const KEY_FINANCIAL_DATA: &str = "financialData";
pub const KEY_PROFIT_LOSS: &str = "profitLossReport";
pub const KEY_BALANCE_SHEET: &str = "balanceSheetReport";
pub const KEY_RATIOS: &str = "ratiosData";

/// Blocking string key-value store that finished JSON is handed to.
/// Writes are last-writer-wins.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT DEFAULT (datetime('now'))
);
";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |r| r.get(0))
            .optional()?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now')) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Typed helpers
// ---------------------------------------------------------------------------

pub fn save_rows(store: &mut dyn Store, rows: &[CanonicalRow]) -> Result<()> {
    store.set(KEY_FINANCIAL_DATA, &serde_json::to_string(rows)?)
}

pub fn load_rows(store: &dyn Store) -> Result<Option<Vec<CanonicalRow>>> {
    match store.get(KEY_FINANCIAL_DATA)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_reports(
    store: &mut dyn Store,
    pnl: &ProfitLoss,
    balance: &BalanceSheet,
    ratios: &RatioInputs,
) -> Result<()> {
    store.set(KEY_PROFIT_LOSS, &serde_json::to_string(pnl)?)?;
    store.set(KEY_BALANCE_SHEET, &serde_json::to_string(balance)?)?;
    store.set(KEY_RATIOS, &serde_json::to_string(ratios)?)?;
    Ok(())
}

pub fn load_profit_loss(store: &dyn Store) -> Result<Option<ProfitLoss>> {
    Ok(match store.get(KEY_PROFIT_LOSS)? {
        Some(json) => Some(serde_json::from_str(&json)?),
        None => None,
    })
}

pub fn load_balance_sheet(store: &dyn Store) -> Result<Option<BalanceSheet>> {
    Ok(match store.get(KEY_BALANCE_SHEET)? {
        Some(json) => Some(serde_json::from_str(&json)?),
        None => None,
    })
}

pub fn load_ratio_inputs(store: &dyn Store) -> Result<Option<RatioInputs>> {
    Ok(match store.get(KEY_RATIOS)? {
        Some(json) => Some(serde_json::from_str(&json)?),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Amount;

    fn test_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    fn sample() -> Vec<CanonicalRow> {
        vec![CanonicalRow {
            name: "Sales".to_string(),
            debit: Amount::Empty,
            credit: Amount::Number(1000.0),
        }]
    }

    #[test]
    fn test_sqlite_set_get_overwrite() {
        let (_dir, mut store) = test_store();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("test.db");
        let mut store = SqliteStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        drop(store);
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_rows_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        assert!(load_rows(&store).unwrap().is_none());
        save_rows(&mut store, &sample()).unwrap();
        assert_eq!(load_rows(&store).unwrap(), Some(sample()));
        let raw = store.get(KEY_FINANCIAL_DATA).unwrap().unwrap();
        assert_eq!(raw, r#"[{"Particulars":"Sales","Debit":"","Credit":1000.0}]"#);
    }

    #[test]
    fn test_reports_saved_under_fixed_keys() {
        let (_dir, mut store) = test_store();
        let reports = crate::reports::generate(&sample());
        save_reports(&mut store, &reports.profit_loss, &reports.balance_sheet, &reports.ratio_inputs).unwrap();
        let pnl = load_profit_loss(&store).unwrap().unwrap();
        assert_eq!(pnl.total_income, 1000.0);
        assert!(load_balance_sheet(&store).unwrap().is_some());
        assert_eq!(load_ratio_inputs(&store).unwrap().unwrap().sales, 1000.0);
        let json = store.get(KEY_PROFIT_LOSS).unwrap().unwrap();
        assert!(json.contains("\"totalIncome\""));
    }
}

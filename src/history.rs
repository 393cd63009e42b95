//! SQLite ledger of completed generation runs.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};

use crate::error::AppError;
use crate::pricing::TokenUsage;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    model TEXT NOT NULL,
    input_tokens INTEGER NOT NULL,
    output_tokens INTEGER NOT NULL,
    cache_creation_tokens INTEGER NOT NULL,
    cache_read_tokens INTEGER NOT NULL,
    total_cost REAL NOT NULL,
    cache_enabled INTEGER NOT NULL,
    output_file TEXT NOT NULL
)";

#[derive(Debug, Clone)]
pub(crate) struct RunRecord {
    pub(crate) timestamp: String,
    pub(crate) model: String,
    pub(crate) usage: TokenUsage,
    pub(crate) total_cost: f64,
    pub(crate) cache_enabled: bool,
    pub(crate) output_file: String,
}

pub(crate) struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the ledger at its default location. `POSTGEN_DATA_DIR`
    /// overrides the platform data directory.
    pub(crate) fn open_default() -> Result<Self, AppError> {
        let dir = std::env::var_os("POSTGEN_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|d| d.join("postgen")))
            .ok_or(AppError::NoDataDir)?;
        Self::open(&dir.join("history.db"))
    }

    pub(crate) fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| AppError::WriteFile {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub(crate) fn record(&self, record: &RunRecord) -> Result<(), AppError> {
        self.conn.execute(
            "INSERT INTO runs (timestamp, model, input_tokens, output_tokens,
                cache_creation_tokens, cache_read_tokens, total_cost,
                cache_enabled, output_file)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.timestamp,
                record.model,
                record.usage.input_tokens,
                record.usage.output_tokens,
                record.usage.cache_creation_input_tokens,
                record.usage.cache_read_input_tokens,
                record.total_cost,
                record.cache_enabled,
                record.output_file,
            ],
        )?;
        Ok(())
    }

    /// All recorded runs, oldest first
    pub(crate) fn list(&self) -> Result<Vec<RunRecord>, AppError> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, model, input_tokens, output_tokens,
                cache_creation_tokens, cache_read_tokens, total_cost,
                cache_enabled, output_file
             FROM runs ORDER BY timestamp, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RunRecord {
                timestamp: row.get(0)?,
                model: row.get(1)?,
                usage: TokenUsage {
                    input_tokens: row.get(2)?,
                    output_tokens: row.get(3)?,
                    cache_creation_input_tokens: row.get(4)?,
                    cache_read_input_tokens: row.get(5)?,
                },
                total_cost: row.get(6)?,
                cache_enabled: row.get(7)?,
                output_file: row.get(8)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp: &str, cost: f64) -> RunRecord {
        RunRecord {
            timestamp: timestamp.to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            usage: TokenUsage {
                input_tokens: 19_000,
                output_tokens: 2_000,
                cache_creation_input_tokens: 0,
                cache_read_input_tokens: 20_000,
            },
            total_cost: cost,
            cache_enabled: true,
            output_file: "posts/out.md".to_string(),
        }
    }

    #[test]
    fn record_and_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = HistoryDb::open(&dir.path().join("history.db")).unwrap();

        db.record(&sample("2026-02-06T10:00:00+00:00", 0.093)).unwrap();
        let records = db.list().unwrap();
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.model, "claude-3-5-sonnet-20241022");
        assert_eq!(r.usage.cache_read_input_tokens, 20_000);
        assert!((r.total_cost - 0.093).abs() < 1e-12);
        assert!(r.cache_enabled);
    }

    #[test]
    fn list_orders_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let db = HistoryDb::open(&dir.path().join("history.db")).unwrap();

        db.record(&sample("2026-02-07T09:00:00+00:00", 0.2)).unwrap();
        db.record(&sample("2026-02-06T09:00:00+00:00", 0.1)).unwrap();

        let records = db.list().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].timestamp < records[1].timestamp);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("postgen").join("history.db");
        HistoryDb::open(&nested).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        HistoryDb::open(&path)
            .unwrap()
            .record(&sample("2026-02-06T10:00:00+00:00", 0.093))
            .unwrap();

        let db = HistoryDb::open(&path).unwrap();
        assert_eq!(db.list().unwrap().len(), 1);
    }
}

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;
use tracing::info;

use crate::record::CanonicalJobRecord;

pub const DEFAULT_DB_PATH: &str = "data/job_postings.sqlite";
pub const DEFAULT_COLLECTION: &str = "job_postings_data";

/// Write-only document store: append documents to a named collection.
pub trait RecordStore {
    /// Insert every document or none of them.
    fn insert_many(&mut self, collection: &str, documents: &[Value]) -> Result<usize>;
}

/// Document store on SQLite: one table per collection, one JSON
/// document per row.
pub struct SqliteStore {
    conn: Connection,
    run_id: String,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self::with_connection(conn))
    }

    /// Read-only handle on a database that must already exist.
    pub fn open_existing(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("No record store at {:?}", path))?;
        Ok(Self::with_connection(conn))
    }

    fn with_connection(conn: Connection) -> Self {
        SqliteStore {
            conn,
            run_id: new_run_id(),
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Ok(Self::with_connection(Connection::open_in_memory()?))
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn ensure_collection(&self, collection: &str) -> Result<()> {
        validate_collection(collection)?;
        self.conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{collection}" (
                id          INTEGER PRIMARY KEY,
                run_id      TEXT NOT NULL,
                document    TEXT NOT NULL,
                inserted_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#
        ))?;
        Ok(())
    }

    /// Number of documents in `collection`; 0 if it was never written.
    pub fn count(&self, collection: &str) -> Result<usize> {
        validate_collection(collection)?;
        let exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [collection],
            |r| r.get(0),
        )?;
        if !exists {
            return Ok(0);
        }
        let n: usize = self.conn.query_row(
            &format!(r#"SELECT COUNT(*) FROM "{collection}""#),
            [],
            |r| r.get(0),
        )?;
        Ok(n)
    }

    #[cfg(test)]
    pub fn documents(&self, collection: &str) -> Result<Vec<Value>> {
        self.ensure_collection(collection)?;
        let mut stmt = self
            .conn
            .prepare(&format!(r#"SELECT document FROM "{collection}" ORDER BY id"#))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.iter()
            .map(|s| serde_json::from_str(s).map_err(Into::into))
            .collect()
    }
}

impl RecordStore for SqliteStore {
    fn insert_many(&mut self, collection: &str, documents: &[Value]) -> Result<usize> {
        self.ensure_collection(collection)?;
        let tx = self.conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(&format!(
                r#"INSERT INTO "{collection}" (run_id, document) VALUES (?1, ?2)"#
            ))?;
            for doc in documents {
                count += stmt.execute(rusqlite::params![self.run_id, serde_json::to_string(doc)?])?;
            }
        }
        tx.commit()?;
        Ok(count)
    }
}

/// Collection names become table names, so keep them to `[A-Za-z0-9_]`.
fn validate_collection(name: &str) -> Result<()> {
    ensure!(
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        "invalid collection name {:?}",
        name
    );
    Ok(())
}

fn new_run_id() -> String {
    format!("run-{}", chrono::Utc::now().format("%Y%m%dT%H%M%SZ"))
}

/// Appends canonical records to one collection of a [`RecordStore`].
pub struct RecordStoreSink<'a, S: RecordStore> {
    store: &'a mut S,
    collection: String,
}

impl<'a, S: RecordStore> RecordStoreSink<'a, S> {
    pub fn new(store: &'a mut S, collection: impl Into<String>) -> Self {
        RecordStoreSink {
            store,
            collection: collection.into(),
        }
    }

    pub fn persist(&mut self, records: &[CanonicalJobRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let documents = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let n = self
            .store
            .insert_many(&self.collection, &documents)
            .with_context(|| format!("Failed to insert into collection {}", self.collection))?;
        info!(collection = %self.collection, inserted = n, "records persisted");
        Ok(n)
    }
}

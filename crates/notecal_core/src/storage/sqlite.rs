//! SQLite key-value storage.
//!
//! # Responsibility
//! - Keep the serialized note store under one key of `kv_store`.
//!
//! # Invariants
//! - Writes are upserts of the full payload.
//! - The connection must come from `db::open_db*` (migrations applied).

use super::{NoteStorage, StorageError, StorageResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

const KV_TABLE: &str = "kv_store";

/// SQLite-backed payload storage, scoped to one key.
pub struct SqliteNoteStorage {
    conn: Connection,
    key: String,
}

impl SqliteNoteStorage {
    /// Wraps a migrated connection.
    pub fn try_new(conn: Connection, key: impl Into<String>) -> StorageResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn,
            key: key.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Removes the payload for this key. Returns whether a row existed.
    pub fn reset(&mut self) -> StorageResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [self.key.as_str()])?;
        Ok(changed > 0)
    }
}

impl NoteStorage for SqliteNoteStorage {
    fn load(&self) -> StorageResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save(&mut self, payload: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), payload],
        )?;
        debug!(
            "event=storage_save module=storage status=ok backend=sqlite bytes={}",
            payload.len()
        );
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> StorageResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(StorageError::MissingRequiredTable(KV_TABLE))
    }
}

//! SQLite store for [`ItemEvent`]s at `<dir>/audit.db`.
//!
//! Recording never fails the caller: if the database can't be opened or
//! written, item operations go ahead unrecorded.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::types::{ToSql, Type};
use rusqlite::{params, Connection, Row};

use super::ItemEvent;
use crate::errors::{ItemVaultError, Result};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS item_history (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        event     TEXT NOT NULL,
        vault     TEXT NOT NULL,
        item_id   TEXT NOT NULL,
        item_name TEXT NOT NULL,
        detail    TEXT
    );
    CREATE INDEX IF NOT EXISTS item_history_item ON item_history (item_id);
";

/// One recorded event.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub event: ItemEvent,
    /// Vault name at the time of the event.
    pub vault: String,
    pub item_id: String,
    /// Item name at the time of the event.
    pub item_name: String,
    /// Attachment name for attachment events, target vault for moves.
    pub detail: Option<String>,
}

/// Selects entries for [`AuditLog::query`].
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    pub limit: usize,
    pub since: Option<DateTime<Utc>>,
    /// Item id, id prefix, or item name (case-insensitive).
    ///
    /// Names match what the item was called when the event was recorded,
    /// so deleted items can still be looked up.
    pub item: Option<String>,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            limit: 50,
            since: None,
            item: None,
        }
    }
}

pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the database at `<dir>/audit.db`.
    ///
    /// `None` means history is unavailable.
    pub fn open(dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(dir);
        let conn = Connection::open(&db_path).ok()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&db_path, std::fs::Permissions::from_mode(0o600));
        }

        conn.execute_batch(SCHEMA).ok()?;
        Some(Self { conn })
    }

    pub fn db_path(dir: &Path) -> PathBuf {
        dir.join("audit.db")
    }

    /// Record an event. Errors are ignored.
    pub fn record(
        &self,
        event: ItemEvent,
        vault: &str,
        item_id: &str,
        item_name: &str,
        detail: Option<&str>,
    ) {
        let _ = self.conn.execute(
            "INSERT INTO item_history (timestamp, event, vault, item_id, item_name, detail)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Utc::now().to_rfc3339(),
                event.as_str(),
                vault,
                item_id,
                item_name,
                detail
            ],
        );
    }

    /// Entries matching `filter`, newest first.
    pub fn query(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>> {
        let mut clauses = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(since) = filter.since {
            args.push(Box::new(since.to_rfc3339()));
            clauses.push(format!("timestamp >= ?{}", args.len()));
        }
        if let Some(item) = &filter.item {
            args.push(Box::new(item.clone()));
            let n = args.len();
            // substr rather than LIKE: ids may contain '%' or '_'.
            clauses.push(format!(
                "(substr(item_id, 1, length(?{n})) = ?{n} OR item_name = ?{n} COLLATE NOCASE)"
            ));
        }
        args.push(Box::new(i64::try_from(filter.limit).unwrap_or(i64::MAX)));

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT id, timestamp, event, vault, item_id, item_name, detail
             FROM item_history
             {where_sql}
             ORDER BY id DESC
             LIMIT ?{}",
            args.len()
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| ItemVaultError::AuditError(format!("query prepare: {e}")))?;
        let arg_refs: Vec<&dyn ToSql> = args.iter().map(|a| a.as_ref()).collect();
        let rows = stmt
            .query_map(arg_refs.as_slice(), entry_from_row)
            .map_err(|e| ItemVaultError::AuditError(format!("query exec: {e}")))?;

        rows.map(|row| row.map_err(|e| ItemVaultError::AuditError(format!("row parse: {e}"))))
            .collect()
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    let timestamp: String = row.get(1)?;
    let event: String = row.get(2)?;

    Ok(HistoryEntry {
        id: row.get(0)?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?
            .with_timezone(&Utc),
        event: event
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        vault: row.get(3)?,
        item_id: row.get(4)?,
        item_name: row.get(5)?,
        detail: row.get(6)?,
    })
}

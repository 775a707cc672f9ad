//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation (set, get, heal, clear, forget)
//! in a local SQLite database at `<vault_dir>/audit.db`.  Secret values
//! never reach the log; only the operation, the slot it touched and a
//! short detail string.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::Path;
#[cfg(feature = "audit-log")]
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::cli::Cli;
#[cfg(feature = "audit-log")]
use crate::errors::MnemoVaultError;
use crate::errors::Result;

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub slot: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
#[cfg(feature = "audit-log")]
pub struct AuditLog {
    conn: rusqlite::Connection,
}

#[cfg(feature = "audit-log")]
impl AuditLog {
    /// Open (or create) the audit database at `<vault_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened; callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(vault_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(vault_dir);
        let conn = rusqlite::Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                slot        TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget; errors are only traced.
    pub fn log(&self, operation: &str, slot: Option<&str>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        if let Err(e) = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, slot, details)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![now, operation, slot, details],
        ) {
            tracing::debug!(error = %e, operation, "audit insert failed");
        }
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let since_str = since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, slot, details
                 FROM audit_log
                 WHERE ?1 IS NULL OR timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| MnemoVaultError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_str, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    slot: row.get(3)?,
                    details: row.get(4)?,
                })
            })
            .map_err(|e| MnemoVaultError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| MnemoVaultError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database (for testing/display).
    pub fn db_path(vault_dir: &Path) -> PathBuf {
        vault_dir.join("audit.db")
    }
}

/// Convenience helper: log an audit event using the CLI context.
///
/// Opens the audit database, logs the event, and silently ignores any errors.
/// Safe to call from any command; it never fails the parent operation.
pub fn log_audit(cli: &Cli, op: &str, slot: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    {
        let Ok(vault_dir) = crate::cli::vault_dir(cli) else {
            return;
        };
        if !vault_dir.exists() {
            return;
        }
        if let Some(audit) = AuditLog::open(&vault_dir) {
            audit.log(op, slot, details);
        }
    }

    #[cfg(not(feature = "audit-log"))]
    let _ = (cli, op, slot, details);
}

/// Read recent entries from the audit log in `vault_dir`.
pub fn recent_entries(
    vault_dir: &Path,
    limit: usize,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<AuditEntry>> {
    #[cfg(feature = "audit-log")]
    {
        let audit = AuditLog::open(vault_dir).ok_or_else(|| {
            MnemoVaultError::AuditError("failed to open audit database".into())
        })?;
        audit.query(limit, since)
    }

    #[cfg(not(feature = "audit-log"))]
    {
        let _ = (vault_dir, limit, since);
        Err(crate::errors::MnemoVaultError::AuditError(
            "audit log not compiled in — rebuild with the `audit-log` feature".into(),
        ))
    }
}

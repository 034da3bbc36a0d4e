//! The SQLite-backed Ledger Host implementation.

use chronicle_host::{HostError, LedgerHost, Row, RowFeed};
use chronicle_types::ColumnSpec;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

/// A Ledger Host over a single SQLite connection.
///
/// Stateless beyond the borrowed connection: callers hand one pooled
/// connection per invocation and drop the host afterwards, so nothing is
/// cached across invocations.
#[derive(Debug)]
pub struct SqliteHost<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteHost<'c> {
    /// Wraps a connection. The host's own tables must already exist —
    /// run [`crate::run_migrations`] on the connection (or pool) first.
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Returns the name of the table's first primary-key column.
    fn key_column(&self, table: &str) -> Result<String, HostError> {
        validate_identifier(table)?;

        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .map_err(storage)?;

        // table_info: (cid, name, type, notnull, dflt_value, pk); pk is the
        // 1-based position within the primary key, 0 for non-key columns.
        let mut keys: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(5)?, row.get::<_, String>(1)?)))
            .map_err(storage)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage)?
            .into_iter()
            .filter(|(pk, _)| *pk > 0)
            .collect();

        keys.sort_by_key(|(pk, _)| *pk);
        keys.into_iter()
            .map(|(_, name)| name)
            .next()
            .ok_or_else(|| {
                HostError::InvalidTable(format!("table '{table}' has no key column"))
            })
    }
}

impl LedgerHost for SqliteHost<'_> {
    fn create_table(&self, table: &str, columns: &[ColumnSpec]) -> Result<(), HostError> {
        validate_identifier(table)?;
        for column in columns {
            validate_identifier(column.name)?;
        }
        if !columns.iter().any(|c| c.key) {
            return Err(HostError::InvalidTable(format!(
                "table '{table}' declares no key column"
            )));
        }

        let exists: bool = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [table],
                |row| row.get(0),
            )
            .map_err(storage)?;
        if exists {
            return Err(HostError::TableExists(table.to_string()));
        }

        let column_defs: Vec<String> = columns
            .iter()
            .map(|c| format!("{} {} NOT NULL", c.name, c.column_type.as_str()))
            .collect();
        let key_columns: Vec<&str> = columns.iter().filter(|c| c.key).map(|c| c.name).collect();

        let ddl = format!(
            "CREATE TABLE {} ({}, PRIMARY KEY ({}))",
            table,
            column_defs.join(", "),
            key_columns.join(", ")
        );

        self.conn.execute_batch(&ddl).map_err(storage)?;
        tracing::info!(table, columns = columns.len(), "table created");
        Ok(())
    }

    fn insert_row(&self, table: &str, row: &Row) -> Result<bool, HostError> {
        validate_identifier(table)?;

        let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} VALUES ({})",
            table,
            placeholders.join(", ")
        );

        // A primary-key conflict is "not inserted, no error" at this
        // boundary; everything else is a storage failure.
        match self.conn.execute(&sql, params_from_iter(row.iter())) {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Ok(false)
            }
            Err(e) => Err(storage(e)),
        }
    }

    fn get_row(&self, table: &str, key: &str) -> Result<Option<Row>, HostError> {
        let key_column = self.key_column(table)?;

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT * FROM {table} WHERE {key_column} = ?1"
            ))
            .map_err(storage)?;
        let column_count = stmt.column_count();

        stmt.query_row(params![key], |row| {
            (0..column_count)
                .map(|i| row.get::<_, String>(i))
                .collect::<Result<Row, _>>()
        })
        .optional()
        .map_err(storage)
    }

    fn get_rows(&self, table: &str, key_prefix: &str) -> Result<RowFeed, HostError> {
        let key_column = self.key_column(table)?;

        // rowid order is insertion order; the consumer receives rows exactly
        // as stored, with no re-sorting.
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT * FROM {table} WHERE {key_column} LIKE ?1 ESCAPE '\\' ORDER BY rowid ASC"
            ))
            .map_err(storage)?;
        let column_count = stmt.column_count();

        let pattern = format!("{}%", escape_like(key_prefix));
        let rows = stmt
            .query_map(params![pattern], |row| {
                (0..column_count)
                    .map(|i| row.get::<_, String>(i))
                    .collect::<Result<Row, _>>()
            })
            .map_err(storage)?
            .collect::<Result<Vec<Row>, _>>()
            .map_err(storage)?;

        Ok(RowFeed::from_rows(rows))
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, HostError> {
        self.conn
            .query_row(
                "SELECT value FROM host_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), HostError> {
        self.conn
            .execute(
                "INSERT INTO host_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(storage)?;
        Ok(())
    }

    fn emit_notification(&self, topic: &str, payload: &[u8]) -> Result<(), HostError> {
        self.conn
            .execute(
                "INSERT INTO host_notifications (topic, payload) VALUES (?1, ?2)",
                params![topic, payload],
            )
            .map_err(storage)?;
        tracing::debug!(topic, bytes = payload.len(), "notification emitted");
        Ok(())
    }
}

fn storage(e: rusqlite::Error) -> HostError {
    HostError::Storage(e.to_string())
}

/// Rejects names that cannot be safely interpolated into DDL/DML.
fn validate_identifier(name: &str) -> Result<(), HostError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(HostError::InvalidTable(name.to_string()))
    }
}

/// Escapes LIKE wildcards so a prefix matches literally.
fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if c == '%' || c == '_' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

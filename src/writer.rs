//! The table writer: connection lifecycle, scoped sessions, and inserts.
//!
//! One `TableWriter` owns one connection to one database file and writes to
//! one table. Construction is cheap and never touches the backend; the
//! database path and table name are validated lazily on first use.

use std::collections::HashMap;
use std::path::PathBuf;

use rusqlite::types::Value;
use rusqlite::Connection;

use crate::buffer::{BufferConfig, PendingRow, RowBuffer};
use crate::error::{Error, Result};
use crate::executor::{self, StatementOutcome};
use crate::schema::{self, ColumnField, ColumnInfo, FieldValue};

/// Transactional accessor for a single SQLite table.
///
/// Exclusively owns its connection handle; `&mut self` on every backend
/// operation encodes the single-writer assumption. Cross-process contention
/// on the database file is left to SQLite's own locking.
#[derive(Debug)]
pub struct TableWriter {
    db_path: PathBuf,
    table: String,
    strict: bool,
    conn: Option<Connection>,
    schema: Option<Vec<ColumnInfo>>,
    buffer: RowBuffer,
}

impl TableWriter {
    /// Create a writer for `table` in the database at `db_path`.
    ///
    /// Soft statement failures and a buffer threshold of 100 by default.
    pub fn new(db_path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            table: table.into(),
            strict: false,
            conn: None,
            schema: None,
            buffer: RowBuffer::new(BufferConfig::default()),
        }
    }

    /// Set the number of buffered rows that triggers an automatic flush.
    ///
    /// Only meaningful before the first `buffer_insert`.
    pub fn with_buffer_config(mut self, config: BufferConfig) -> Self {
        self.buffer = RowBuffer::new(config);
        self
    }

    /// Escalate statement failures into hard errors instead of logging them.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Table this writer targets.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of rows waiting in the insert buffer.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Whether a connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    // -- connection lifecycle ------------------------------------------------

    /// Open the database file. No-op when already connected.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] if the file cannot be opened.
    pub fn connect(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = Connection::open(&self.db_path).map_err(|source| Error::Connection {
            path: self.db_path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %self.db_path.display(), "opened database");
        self.conn = Some(conn);
        Ok(())
    }

    /// Release the connection handle. Idempotent.
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, err)) = conn.close() {
                tracing::warn!(error = %err, "error closing database");
            }
        }
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotConnected)
    }

    /// Begin a transaction unless one is already active.
    ///
    /// Returns whether this call started it (and so owns its commit/rollback).
    fn begin_if_autocommit(&self) -> Result<bool> {
        let conn = self.conn()?;
        if conn.is_autocommit() {
            conn.execute_batch("BEGIN")?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Run `f` inside a scoped session: connection open for the duration,
    /// commit on `Ok`, rollback on `Err`, handle released afterward if this
    /// scope opened it.
    ///
    /// Nested scopes join the ambient transaction rather than starting a new
    /// one, so sub-operations never hide an implicit commit.
    pub fn with_session<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let opened_here = self.conn.is_none();
        if opened_here {
            self.connect()?;
        }
        let begun = match self.begin_if_autocommit() {
            Ok(begun) => begun,
            Err(err) => {
                if opened_here {
                    self.disconnect();
                }
                return Err(err);
            }
        };

        let mut result = f(self);

        if begun {
            if let Some(conn) = self.conn.as_ref() {
                if result.is_ok() {
                    if let Err(err) = conn.execute_batch("COMMIT") {
                        result = Err(Error::Statement(err));
                    }
                } else if let Err(err) = conn.execute_batch("ROLLBACK") {
                    tracing::warn!(error = %err, "rollback failed");
                }
            }
        }
        if opened_here {
            self.disconnect();
        }
        result
    }

    // -- schema cache --------------------------------------------------------

    /// Ordered column descriptors for the target table.
    ///
    /// Fetched from the backend on first call (over a transient connection if
    /// none is open) and cached for the writer's lifetime; later calls never
    /// touch the backend. Invalidate with [`Self::refresh_table_info`].
    pub fn table_info(&mut self) -> Result<&[ColumnInfo]> {
        if self.schema.is_none() {
            let opened_here = self.conn.is_none();
            if opened_here {
                self.connect()?;
            }
            let fetched = schema::fetch_table_info(self.conn()?, &self.table);
            if opened_here {
                self.disconnect();
            }
            self.schema = Some(fetched?);
        }
        Ok(self.schema.as_deref().expect("schema cache populated above"))
    }

    /// Discard the cached schema and fetch it again.
    pub fn refresh_table_info(&mut self) -> Result<&[ColumnInfo]> {
        self.schema = None;
        self.table_info()
    }

    /// Column names in table order.
    pub fn column_names(&mut self) -> Result<Vec<String>> {
        Ok(self.table_info()?.iter().map(|c| c.name.clone()).collect())
    }

    /// Project one descriptor field across all columns, keyed by column name.
    ///
    /// `field` is one of `position`, `name`, `type`, `not-null`, `default`,
    /// `primary-key`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a selector outside that set.
    pub fn column_info(&mut self, field: &str) -> Result<HashMap<String, FieldValue>> {
        let field: ColumnField = field.parse()?;
        Ok(self
            .table_info()?
            .iter()
            .map(|c| (c.name.clone(), c.field(field)))
            .collect())
    }

    /// Name of the primary-key column, or `None` for a keyless table.
    pub fn primary_key(&mut self) -> Result<Option<String>> {
        Ok(self
            .table_info()?
            .iter()
            .find(|c| c.primary_key)
            .map(|c| c.name.clone()))
    }

    // -- statement execution -------------------------------------------------

    /// Execute one parameterized statement on the open connection.
    ///
    /// Values travel through `?` placeholders only. Requires an open
    /// connection; use [`Self::with_session`] to scope one.
    ///
    /// # Errors
    ///
    /// [`Error::NotConnected`] without an open handle; [`Error::Statement`]
    /// in strict mode when the backend rejects the statement.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementOutcome> {
        let outcome = executor::run_statement(self.conn()?, sql, params);
        if self.strict {
            if let StatementOutcome::Failed(err) = outcome {
                return Err(Error::Statement(err));
            }
        }
        Ok(outcome)
    }

    // -- inserts -------------------------------------------------------------

    /// Queue one row for insertion without touching the backend.
    ///
    /// Flushes automatically once the buffer reaches its threshold.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `columns` and `values` differ in
    /// length; any flush error when the threshold is hit.
    pub fn buffer_insert(&mut self, columns: &[&str], values: Vec<Value>) -> Result<()> {
        let row = PendingRow::new(
            columns.iter().map(|c| (*c).to_string()).collect(),
            values,
        )?;
        if self.buffer.push(row) {
            self.flush()?;
        }
        Ok(())
    }

    /// Write all buffered rows in one transaction, in insertion order.
    ///
    /// No-op on an empty buffer. In the default soft mode a rejected row is
    /// logged and skipped while the rest of the batch still commits; in
    /// strict mode the first rejection rolls back the whole batch. The buffer
    /// is cleared only after the flush succeeds, so a failed flush leaves
    /// every pending row in place for retry.
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let pending = self.buffer.len();
        self.with_session(|w| {
            for idx in 0..w.buffer.len() {
                let row = w.buffer.rows()[idx].clone();
                let sql = executor::build_insert(&w.table, &row.columns);
                w.execute(&sql, &row.values)?;
            }
            Ok(())
        })?;
        self.buffer.clear();
        tracing::debug!(rows = pending, table = %self.table, "flushed insert buffer");
        Ok(())
    }

    /// Insert one row immediately, bypassing the buffer.
    ///
    /// Runs inside its own scoped session: committed on success, rolled back
    /// on error, connection released afterward.
    pub fn insert_row(&mut self, columns: &[&str], values: Vec<Value>) -> Result<StatementOutcome> {
        let row = PendingRow::new(
            columns.iter().map(|c| (*c).to_string()).collect(),
            values,
        )?;
        let sql = executor::build_insert(&self.table, &row.columns);
        self.with_session(move |w| w.execute(&sql, &row.values))
    }

    // -- maintenance ---------------------------------------------------------

    /// Delete every row in the table and VACUUM the database.
    ///
    /// VACUUM cannot run inside a transaction, so this must be called outside
    /// any session scope. Opens a transient connection when none is open.
    pub fn clear_table(&mut self) -> Result<()> {
        let opened_here = self.conn.is_none();
        if opened_here {
            self.connect()?;
        }
        let sql = format!(
            "DELETE FROM {}; VACUUM;",
            executor::quote_ident(&self.table)
        );
        let result = self
            .conn()
            .and_then(|conn| conn.execute_batch(&sql).map_err(Error::Statement));
        if opened_here {
            self.disconnect();
        }
        result
    }
}

impl Drop for TableWriter {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            tracing::warn!(
                rows = self.buffer.len(),
                table = %self.table,
                "writer dropped with unflushed rows"
            );
        }
        self.disconnect();
    }
}

//! Single-statement execution with a non-fatal outcome.
//!
//! The executor never interpolates values into SQL text; every value travels
//! through a `?` placeholder. Identifiers (table and column names) cannot be
//! parameterized in SQLite, so they are double-quoted here instead — callers
//! remain responsible for composing sensible identifiers.

use rusqlite::types::Value;
use rusqlite::Connection;

/// Result of executing one statement.
///
/// A failed statement did not take effect; whether that is fatal is the
/// caller's policy (soft by default, strict mode re-raises).
#[derive(Debug)]
pub enum StatementOutcome {
    /// Statement succeeded, affecting this many rows.
    Applied(usize),
    /// The backend rejected the statement.
    Failed(rusqlite::Error),
}

impl StatementOutcome {
    /// Whether the statement took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Convert the outcome into a hard result, for strict-mode callers.
    pub fn into_result(self) -> Result<usize, rusqlite::Error> {
        match self {
            Self::Applied(count) => Ok(count),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Execute one parameterized statement on an open connection.
///
/// Backend failure is reported via `tracing::warn!` and returned as
/// [`StatementOutcome::Failed`] rather than propagated; the caller decides
/// whether to escalate.
pub(crate) fn run_statement(conn: &Connection, sql: &str, params: &[Value]) -> StatementOutcome {
    match conn.execute(sql, rusqlite::params_from_iter(params.iter())) {
        Ok(count) => StatementOutcome::Applied(count),
        Err(err) => {
            tracing::warn!(sql, error = %err, "statement failed");
            StatementOutcome::Failed(err)
        }
    }
}

/// Quote an SQL identifier, doubling any embedded quotes.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Build an INSERT statement for `table` with one `?` placeholder per column.
pub(crate) fn build_insert(table: &str, columns: &[String]) -> String {
    let column_list = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({column_list}) VALUES ({placeholders})",
        quote_ident(table)
    )
}

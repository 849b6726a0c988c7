//! Test fixtures for rowsink integration tests.
//!
//! Provides:
//! - Temporary on-disk database files (transient reconnects need a real file,
//!   so `:memory:` is not usable here)
//! - Schema setup and read-back helpers that bypass the writer under test

use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test fixture that manages a temporary database file.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary directory holding the database
    pub temp_dir: TempDir,
    /// Path to the database file
    pub db_path: PathBuf,
}

impl TestFixture {
    /// Create a new fixture with an empty temporary database.
    pub fn new() -> Self {
        init_test_tracing();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        Self { temp_dir, db_path }
    }

    /// Fixture with the worked-example table:
    /// `t(id INTEGER PRIMARY KEY, name TEXT NOT NULL, score INTEGER DEFAULT 0)`.
    pub fn with_scores_table() -> Self {
        let fixture = Self::new();
        fixture.execute_batch(
            "CREATE TABLE t (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                score INTEGER DEFAULT 0
            )",
        );
        fixture
    }

    /// Run setup SQL over a throwaway connection.
    pub fn execute_batch(&self, sql: &str) {
        let conn = Connection::open(&self.db_path).expect("failed to open test db");
        conn.execute_batch(sql).expect("setup SQL failed");
    }

    /// Count rows in `table` over a throwaway connection.
    pub fn count(&self, table: &str) -> i64 {
        let conn = Connection::open(&self.db_path).expect("failed to open test db");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .expect("count query failed")
    }

    /// Read back all rows of the worked-example table in rowid order.
    pub fn read_scores(&self) -> Vec<(i64, String, i64)> {
        let conn = Connection::open(&self.db_path).expect("failed to open test db");
        let mut stmt = conn
            .prepare("SELECT id, name, score FROM t ORDER BY rowid")
            .expect("prepare failed");
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .expect("query failed")
            .collect::<Result<Vec<_>, _>>()
            .expect("row decode failed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize tracing for tests (only logs errors).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}

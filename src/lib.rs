//! Rowsink: a buffered single-table writer for embedded SQLite.
//!
//! One [`TableWriter`] owns one connection to one database file and writes to
//! one table: it introspects the table's column metadata (cached after the
//! first fetch), executes parameterized statements, and batches inserts into
//! a single transaction once a configurable threshold is reached.
//!
//! # Design
//!
//! - **Scoped sessions**: a unit of work opens one session; commit on normal
//!   exit, rollback on error, handle released either way
//! - **Soft statement failures**: a rejected statement is logged and returned
//!   as an outcome, not raised — strict mode escalates instead
//! - **Single writer**: synchronous, no internal locking; cross-process
//!   contention is left to SQLite's file locking
//!
//! # Modules
//!
//! - [`buffer`]: pending-row accumulation and flush threshold
//! - [`error`]: error taxonomy
//! - [`executor`]: parameterized statement execution
//! - [`schema`]: column metadata introspection
//! - [`writer`]: the `TableWriter` accessor
//!
//! # Example
//!
//! ```no_run
//! use rowsink::{TableWriter, Value};
//!
//! let mut writer = TableWriter::new("app.db", "users");
//! writer.buffer_insert(
//!     &["name", "score"],
//!     vec![Value::Text("alice".into()), Value::Integer(5)],
//! )?;
//! writer.flush()?;
//! # Ok::<(), rowsink::Error>(())
//! ```

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions, // buffer::BufferConfig is fine
    clippy::must_use_candidate,      // Not all functions need #[must_use]
    clippy::missing_errors_doc       // Error docs can be verbose
)]

pub mod buffer;
pub mod error;
pub mod executor;
pub mod schema;
pub mod writer;

pub use buffer::BufferConfig;
pub use error::{Error, Result};
pub use executor::StatementOutcome;
pub use schema::{ColumnField, ColumnInfo, FieldValue};
pub use writer::TableWriter;

/// Re-export of the SQLite value type used for row data.
pub use rusqlite::types::Value;

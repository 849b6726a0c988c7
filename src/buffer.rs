//! Insert buffering.
//!
//! Rows are accumulated in memory and flushed as a single transaction once the
//! configured threshold is reached (or on explicit flush). The buffer itself
//! never touches the backend; [`crate::writer::TableWriter::flush`] drives it.

use rusqlite::types::Value;

use crate::error::{Error, Result};

/// Configuration for the insert buffer.
#[derive(Debug, Clone, Copy)]
pub struct BufferConfig {
    /// Number of pending rows that triggers an automatic flush
    pub threshold: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { threshold: 100 }
    }
}

impl BufferConfig {
    /// Create a test config with a small threshold.
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self { threshold: 3 }
    }
}

/// One row waiting to be inserted: ordered column names paired with values.
#[derive(Debug, Clone)]
pub struct PendingRow {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl PendingRow {
    /// Pair columns with values, rejecting mismatched lengths.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(Error::InvalidArgument(format!(
                "{} column names paired with {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }
}

/// FIFO accumulator for pending inserts.
///
/// States: empty, accumulating, full (len >= threshold). The writer flushes
/// when `push` reports the buffer full.
#[derive(Debug)]
pub struct RowBuffer {
    config: BufferConfig,
    rows: Vec<PendingRow>,
}

impl RowBuffer {
    /// Create an empty buffer with the given configuration.
    pub fn new(config: BufferConfig) -> Self {
        Self {
            config,
            rows: Vec::with_capacity(config.threshold),
        }
    }

    /// Append a row.
    ///
    /// Returns true if the buffer has reached its threshold.
    pub fn push(&mut self, row: PendingRow) -> bool {
        self.rows.push(row);
        self.is_full()
    }

    /// Whether the buffer has reached its flush threshold.
    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.config.threshold
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Pending rows in insertion order, without draining them.
    ///
    /// Flush iterates these and only clears on success, so a failed flush
    /// preserves the rows for retry.
    pub fn rows(&self) -> &[PendingRow] {
        &self.rows
    }

    /// Drop all pending rows after a successful flush.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

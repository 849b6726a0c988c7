//! Table schema introspection.
//!
//! Wraps SQLite's `PRAGMA table_info` metadata query and exposes per-column
//! descriptors. Fetching is done once per writer instance and cached; see
//! [`crate::writer::TableWriter::table_info`].

use std::str::FromStr;

use rusqlite::Connection;

use crate::error::Error;

/// Descriptor for a single table column, as reported by `PRAGMA table_info`.
///
/// Immutable once fetched. The primary-key flag is true for at most one column
/// in the supported cases (composite keys are out of scope).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// Ordinal position within the table (0-based, matches `cid`)
    pub position: i64,
    /// Column name, unique within the table
    pub name: String,
    /// Declared type as free-form SQL text (e.g. `INTEGER`, `TEXT`)
    pub decl_type: String,
    /// Whether the column carries a NOT NULL constraint
    pub not_null: bool,
    /// Default value expression as stored in the schema, if any
    pub default_value: Option<String>,
    /// Whether the column is part of the primary key
    pub primary_key: bool,
}

/// Selector for projecting one descriptor field across all columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnField {
    Position,
    Name,
    Type,
    NotNull,
    Default,
    PrimaryKey,
}

impl FromStr for ColumnField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "position" => Ok(Self::Position),
            "name" => Ok(Self::Name),
            "type" => Ok(Self::Type),
            "not-null" => Ok(Self::NotNull),
            "default" => Ok(Self::Default),
            "primary-key" => Ok(Self::PrimaryKey),
            other => Err(Error::InvalidArgument(format!(
                "unknown column field selector: {other:?} (expected one of \
                 position, name, type, not-null, default, primary-key)"
            ))),
        }
    }
}

/// Value of a single projected descriptor field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Bool(bool),
    Null,
}

impl ColumnInfo {
    /// Project one field of this descriptor.
    pub fn field(&self, field: ColumnField) -> FieldValue {
        match field {
            ColumnField::Position => FieldValue::Integer(self.position),
            ColumnField::Name => FieldValue::Text(self.name.clone()),
            ColumnField::Type => FieldValue::Text(self.decl_type.clone()),
            ColumnField::NotNull => FieldValue::Bool(self.not_null),
            ColumnField::Default => self
                .default_value
                .clone()
                .map_or(FieldValue::Null, FieldValue::Text),
            ColumnField::PrimaryKey => FieldValue::Bool(self.primary_key),
        }
    }
}

/// Fetch the ordered column descriptors for `table`.
///
/// Returns an empty vec for a table that does not exist; SQLite reports no
/// rows rather than an error for an unknown table name.
pub(crate) fn fetch_table_info(
    conn: &Connection,
    table: &str,
) -> Result<Vec<ColumnInfo>, rusqlite::Error> {
    let sql = format!("PRAGMA table_info({})", crate::executor::quote_ident(table));
    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                position: row.get(0)?,
                name: row.get(1)?,
                decl_type: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                default_value: row.get(4)?,
                // pk is the 1-based position within the primary key, 0 if none
                primary_key: row.get::<_, i64>(5)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

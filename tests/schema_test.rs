//! Contract tests for schema introspection and caching.
//!
//! Tests:
//! - Every valid field selector projects over exactly the table's columns
//! - The metadata query runs once; later calls serve the cache
//! - Keyless tables report no primary key without erroring

mod common;

use std::collections::HashSet;

use rowsink::{Error, FieldValue, TableWriter};

/// Every valid selector yields a map keyed by exactly the column names.
#[test]
fn test_selectors_cover_all_columns_exactly_once() {
    let fixture = common::TestFixture::with_scores_table();
    let mut writer = TableWriter::new(&fixture.db_path, "t");

    let expected: HashSet<String> = ["id", "name", "score"]
        .into_iter()
        .map(String::from)
        .collect();

    for selector in ["position", "name", "type", "not-null", "default", "primary-key"] {
        let projection = writer.column_info(selector).expect("projection failed");
        let keys: HashSet<String> = projection.keys().cloned().collect();
        assert_eq!(keys, expected, "selector {selector:?} missed columns");
    }
}

#[test]
fn test_unknown_selector_fails_without_backend() {
    // Bad selector must surface before any backend work: path does not exist.
    let mut writer = TableWriter::new("/nonexistent-dir/no.db", "t");
    let err = writer.column_info("cardinality").unwrap_err();
    assert!(
        matches!(err, Error::InvalidArgument(_)),
        "expected InvalidArgument, got {err:?}"
    );
}

/// The cache is populated once; later calls never touch the backend.
#[test]
fn test_table_info_is_fetched_exactly_once() {
    let fixture = common::TestFixture::with_scores_table();
    let mut writer = TableWriter::new(&fixture.db_path, "t");

    let first = writer.table_info().expect("first fetch failed").to_vec();
    assert_eq!(first.len(), 3);

    // Drop the table behind the cache's back; a second backend query would
    // now see nothing.
    fixture.execute_batch("DROP TABLE t");

    let second = writer.table_info().expect("cached fetch failed").to_vec();
    assert_eq!(first, second, "cache should be served without a backend query");
    assert_eq!(
        writer.column_names().expect("column_names failed"),
        vec!["id", "name", "score"]
    );
}

#[test]
fn test_refresh_refetches_from_backend() {
    let fixture = common::TestFixture::with_scores_table();
    let mut writer = TableWriter::new(&fixture.db_path, "t");

    assert_eq!(writer.table_info().expect("fetch failed").len(), 3);

    fixture.execute_batch("ALTER TABLE t ADD COLUMN tag TEXT");

    // Cache still answers with the old shape until explicitly invalidated.
    assert_eq!(writer.table_info().expect("cached fetch failed").len(), 3);
    assert_eq!(
        writer.refresh_table_info().expect("refresh failed").len(),
        4
    );
}

/// Keyless table: `primary_key` returns None, never an error.
#[test]
fn test_keyless_table_has_no_primary_key() {
    let fixture = common::TestFixture::new();
    fixture.execute_batch("CREATE TABLE logbook (entry TEXT, at INTEGER)");

    let mut writer = TableWriter::new(&fixture.db_path, "logbook");
    assert_eq!(writer.primary_key().expect("primary_key failed"), None);
}

/// Worked example: names in table order, primary key identified.
#[test]
fn test_worked_example_metadata() {
    let fixture = common::TestFixture::with_scores_table();
    let mut writer = TableWriter::new(&fixture.db_path, "t");

    assert_eq!(
        writer.column_names().expect("column_names failed"),
        vec!["id", "name", "score"]
    );
    assert_eq!(
        writer.primary_key().expect("primary_key failed"),
        Some("id".to_string())
    );
}

#[test]
fn test_descriptor_fields_match_declared_schema() {
    let fixture = common::TestFixture::with_scores_table();
    let mut writer = TableWriter::new(&fixture.db_path, "t");

    let not_null = writer.column_info("not-null").expect("projection failed");
    assert_eq!(not_null["name"], FieldValue::Bool(true));
    assert_eq!(not_null["score"], FieldValue::Bool(false));

    let defaults = writer.column_info("default").expect("projection failed");
    assert_eq!(defaults["score"], FieldValue::Text("0".into()));
    assert_eq!(defaults["name"], FieldValue::Null);

    let types = writer.column_info("type").expect("projection failed");
    assert_eq!(types["id"], FieldValue::Text("INTEGER".into()));
    assert_eq!(types["name"], FieldValue::Text("TEXT".into()));

    let positions = writer.column_info("position").expect("projection failed");
    assert_eq!(positions["id"], FieldValue::Integer(0));
    assert_eq!(positions["score"], FieldValue::Integer(2));
}

/// Metadata fetch over a transient connection leaves the writer disconnected.
#[test]
fn test_transient_metadata_connection_is_released() {
    let fixture = common::TestFixture::with_scores_table();
    let mut writer = TableWriter::new(&fixture.db_path, "t");

    writer.table_info().expect("fetch failed");
    assert!(!writer.is_connected());
}

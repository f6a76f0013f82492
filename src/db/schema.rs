//! SQL text issued by the ingest path.
//!
//! Identifiers come from a validated [`TableName`]; every key and value is
//! bound as a parameter, so record contents never appear in SQL text.

use super::TableName;
use quackgate_schema::IngestRecord;

/// DDL for an ingest table: one `data` column holding the whole record.
pub fn create_map_table_sql(table: &TableName) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (data MAP(VARCHAR, VARCHAR))",
        table.quoted()
    )
}

/// Map constructor with one `(key, value)` placeholder pair per entry.
pub fn map_literal_sql(entries: usize) -> String {
    if entries == 0 {
        return "map()".to_string();
    }
    let tuples = vec!["(?::VARCHAR, ?::VARCHAR)"; entries].join(", ");
    format!("map_from_entries([{tuples}])")
}

pub fn insert_map_row_sql(table: &TableName, entries: usize) -> String {
    format!(
        "INSERT INTO {} (data) VALUES ({})",
        table.quoted(),
        map_literal_sql(entries)
    )
}

/// Parameters for [`insert_map_row_sql`], key then value for each entry.
pub fn map_row_params(record: &IngestRecord) -> Vec<&str> {
    record
        .iter()
        .flat_map(|(key, value)| [key.as_str(), value.as_str()])
        .collect()
}

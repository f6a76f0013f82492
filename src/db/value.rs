//! Conversion from DuckDB values into the `CellValue` wire representation.

use crate::error::GatewayError;
use base64::Engine as _;
use duckdb::types::Value;
use quackgate_schema::{CellValue, QueryRow};
use std::collections::BTreeMap;

/// Converts the single map column of a result row into a [`QueryRow`].
pub fn map_row_from_value(value: &Value) -> Result<QueryRow, GatewayError> {
    match value {
        Value::Map(entries) => Ok(QueryRow::new(string_keyed(entries.iter())?)),
        Value::Null => Err(GatewayError::DataShape(
            "expected a MAP column, found NULL".to_string(),
        )),
        other => Err(GatewayError::DataShape(format!(
            "expected a MAP column, found {}",
            type_label(other)
        ))),
    }
}

/// Converts any engine value, recursing into lists, structs and maps.
///
/// Map keys must be strings; anything else is a `DataShape` error.
pub fn cell_from_value(value: &Value) -> Result<CellValue, GatewayError> {
    let cell = match value {
        Value::Null => CellValue::Null,
        Value::Boolean(b) => CellValue::Bool(*b),
        Value::TinyInt(i) => CellValue::Int((*i).into()),
        Value::SmallInt(i) => CellValue::Int((*i).into()),
        Value::Int(i) => CellValue::Int((*i).into()),
        Value::BigInt(i) => CellValue::Int(*i),
        Value::HugeInt(i) => {
            if let Ok(n) = i64::try_from(*i) {
                CellValue::Int(n)
            } else if let Ok(n) = u64::try_from(*i) {
                CellValue::UInt(n)
            } else {
                CellValue::Text(i.to_string())
            }
        }
        Value::UTinyInt(i) => CellValue::UInt((*i).into()),
        Value::USmallInt(i) => CellValue::UInt((*i).into()),
        Value::UInt(i) => CellValue::UInt((*i).into()),
        Value::UBigInt(i) => CellValue::UInt(*i),
        Value::Float(f) => CellValue::Float((*f).into()),
        Value::Double(f) => CellValue::Float(*f),
        Value::Text(s) | Value::Enum(s) => CellValue::Text(s.clone()),
        Value::Blob(b) => CellValue::Text(base64::engine::general_purpose::STANDARD.encode(b)),
        Value::List(items) => CellValue::List(
            items
                .iter()
                .map(cell_from_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Struct(fields) => {
            let mut data = BTreeMap::new();
            for (name, field) in fields.iter() {
                data.insert(name.clone(), cell_from_value(field)?);
            }
            CellValue::Map(data)
        }
        Value::Map(entries) => CellValue::Map(string_keyed(entries.iter())?),
        // Dates, times, decimals, intervals and the like have no JSON counterpart.
        other => CellValue::Text(format!("{other:?}")),
    };
    Ok(cell)
}

fn string_keyed<'a>(
    entries: impl Iterator<Item = &'a (Value, Value)>,
) -> Result<BTreeMap<String, CellValue>, GatewayError> {
    let mut data = BTreeMap::new();
    for (key, entry) in entries {
        let key = match key {
            Value::Text(k) | Value::Enum(k) => k.clone(),
            _ => return Err(GatewayError::DataShape("Data error".to_string())),
        };
        data.insert(key, cell_from_value(entry)?);
    }
    Ok(data)
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Boolean(_) => "BOOLEAN",
        Value::TinyInt(_)
        | Value::SmallInt(_)
        | Value::Int(_)
        | Value::BigInt(_)
        | Value::HugeInt(_)
        | Value::UTinyInt(_)
        | Value::USmallInt(_)
        | Value::UInt(_)
        | Value::UBigInt(_) => "INTEGER",
        Value::Float(_) | Value::Double(_) => "FLOAT",
        Value::Text(_) => "VARCHAR",
        Value::Blob(_) => "BLOB",
        Value::List(_) => "LIST",
        Value::Struct(_) => "STRUCT",
        _ => "a non-MAP value",
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a `GET /query` response: `{"data": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct QueryRow {
    pub data: BTreeMap<String, CellValue>,
}

impl QueryRow {
    pub fn new(data: BTreeMap<String, CellValue>) -> Self {
        Self { data }
    }
}

/// A single engine value after conversion at the HTTP boundary.
///
/// Serialized untagged, so `Text("a")` becomes `"a"` and `Map` becomes a
/// plain JSON object. Variant order matters for deserialization: integers are
/// tried before floats.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<CellValue>),
    Map(BTreeMap<String, CellValue>),
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

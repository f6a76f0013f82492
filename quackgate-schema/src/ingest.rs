use std::collections::BTreeMap;

/// Body of `POST /data`: a flat JSON object of string keys to string values.
///
/// Keys are kept sorted so the generated insert statement is deterministic.
pub type IngestRecord = BTreeMap<String, String>;

use crate::error::GatewayError;
use regex::Regex;
use std::sync::LazyLock;

/// Identifiers must start with a letter or underscore and stay within DuckDB's
/// practical identifier length.
static TABLE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("table name pattern must compile")
});

/// A table identifier that passed the allow-list and can be interpolated into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    /// Validates a caller-supplied table name.
    ///
    /// Empty input is `MissingTable`; anything outside the allow-list is `InvalidTable`.
    pub fn parse(raw: &str) -> Result<Self, GatewayError> {
        if raw.is_empty() {
            return Err(GatewayError::MissingTable);
        }
        if !TABLE_NAME_PATTERN.is_match(raw) {
            return Err(GatewayError::InvalidTable(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for use in SQL text.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

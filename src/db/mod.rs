//! Database module: the DuckDB connector and the SQL it issues.
//!
//! Layout:
//! - `actor.rs`: actor owning the process-wide DuckDB connection
//! - `schema.rs`: SQL text for table creation and map-row insertion
//! - `table_name.rs`: validated table identifiers
//! - `value.rs`: conversion from engine values into `CellValue`

pub mod actor;
pub mod schema;
pub mod table_name;
pub mod value;

use std::path::{Path, PathBuf};

pub use actor::{DbActorHandle, spawn};
pub use table_name::TableName;

/// Sentinel path that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Where the connector opens its database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    InMemory,
    File(PathBuf),
}

impl DatabaseTarget {
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        if trimmed.is_empty() || trimmed == IN_MEMORY {
            DatabaseTarget::InMemory
        } else {
            DatabaseTarget::File(PathBuf::from(trimmed))
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            DatabaseTarget::InMemory => None,
            DatabaseTarget::File(path) => Some(path.as_path()),
        }
    }
}

impl std::fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseTarget::InMemory => f.write_str(IN_MEMORY),
            DatabaseTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

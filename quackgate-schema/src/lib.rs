pub mod error_body;
pub mod ingest;
pub mod query;

pub use error_body::{ApiErrorBody, ApiErrorObject};
pub use ingest::IngestRecord;
pub use query::{CellValue, QueryRow};

use super::extract::IngestPreprocess;
use crate::error::GatewayError;
use crate::server::router::GatewayState;
use axum::{extract::State, http::StatusCode};

/// POST /data?table=<name>
///
/// Creates the table on first use and appends the body as one map row.
/// Responds 201 with an empty body.
pub(super) async fn ingest_handler(
    State(state): State<GatewayState>,
    IngestPreprocess(table, record): IngestPreprocess,
) -> Result<StatusCode, GatewayError> {
    state.db.ingest(table, record).await?;
    Ok(StatusCode::CREATED)
}

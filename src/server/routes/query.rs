use crate::error::GatewayError;
use crate::server::router::GatewayState;
use axum::{
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// Raw SQL, executed verbatim. Missing means the empty statement.
    #[serde(default)]
    pub q: String,
}

/// GET /query?q=<sql>
///
/// Each result row must be a single string-keyed MAP column; the response is a
/// JSON array of `{"data": {...}}` objects in row order.
pub(super) async fn query_handler(
    State(state): State<GatewayState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, GatewayError> {
    debug!(sql = %params.q, "Incoming query");

    let rows = state.db.query_map_rows(params.q).await?;
    let body = serde_json::to_vec(&rows).map_err(GatewayError::Encode)?;

    Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
}

use crate::server::router::GatewayState;
use axum::{
    Router,
    routing::{get, post},
};

pub mod extract;
pub mod ingest;
pub mod query;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/query", get(query::query_handler))
        .route("/data", post(ingest::ingest_handler))
}

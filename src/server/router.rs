use crate::db::DbActorHandle;
use crate::server::access_log::access_log;
use crate::server::routes;

use axum::{
    Router,
    http::StatusCode,
    middleware,
    routing::get_service,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{decompression::RequestDecompressionLayer, services::ServeFile};

/// Shared handler context; the connector handle is passed explicitly instead of living in a global.
#[derive(Clone)]
pub struct GatewayState {
    pub db: DbActorHandle,
    pub index_file: Arc<PathBuf>,
}

impl GatewayState {
    pub fn new(db: DbActorHandle, index_file: impl Into<PathBuf>) -> Self {
        Self {
            db,
            index_file: Arc::new(index_file.into()),
        }
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub fn gateway_router(state: GatewayState) -> Router {
    let index = ServeFile::new(state.index_file.as_ref());

    Router::new()
        .merge(routes::router())
        .route("/", get_service(index))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(RequestDecompressionLayer::new().pass_through_unaccepted(true))
        .layer(middleware::from_fn(access_log))
}

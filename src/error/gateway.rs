use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quackgate_schema::{ApiErrorBody, ApiErrorObject};
use thiserror::Error as ThisError;
use tracing::debug;

#[derive(Debug, ThisError)]
pub enum GatewayError {
    #[error("Table name is required")]
    MissingTable,

    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    #[error("{0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("{message}")]
    BodyRead { status: StatusCode, message: String },

    #[error("Failed to open database: {0}")]
    Connection(#[source] duckdb::Error),

    #[error("{0}")]
    Execution(#[from] duckdb::Error),

    #[error("No SQL statement to execute")]
    EmptyStatement,

    #[error("Data error: {0}")]
    DataShape(String),

    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Actor error: {0}")]
    Actor(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingTable
            | GatewayError::InvalidTable(_)
            | GatewayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::BodyRead { status, .. } => *status,
            GatewayError::Connection(_)
            | GatewayError::Execution(_)
            | GatewayError::EmptyStatement
            | GatewayError::DataShape(_)
            | GatewayError::Encode(_)
            | GatewayError::Actor(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::MissingTable => "MISSING_TABLE",
            GatewayError::InvalidTable(_) => "INVALID_TABLE",
            GatewayError::InvalidBody(_) => "INVALID_JSON",
            GatewayError::BodyRead { .. } => "INVALID_BODY",
            GatewayError::Connection(_) => "CONNECTION_ERROR",
            GatewayError::Execution(_) | GatewayError::EmptyStatement => "EXECUTION_ERROR",
            GatewayError::DataShape(_) => "DATA_ERROR",
            GatewayError::Encode(_) => "ENCODE_ERROR",
            GatewayError::Actor(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // Engine and decoder messages are passed through; actor failures are not.
        let message = match &self {
            GatewayError::Actor(_) => {
                debug!(error = %self, "Internal error hidden from response");
                "An internal server error occurred.".to_string()
            }
            GatewayError::DataShape(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = ApiErrorBody {
            inner: ApiErrorObject {
                code: code.to_string(),
                message,
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

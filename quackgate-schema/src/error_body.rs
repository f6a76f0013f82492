use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standardized API error response payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}

use crate::db::TableName;
use crate::error::GatewayError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Query, Request},
};
use quackgate_schema::IngestRecord;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct IngestParams {
    #[serde(default)]
    table: String,
}

pub(crate) struct IngestPreprocess(pub(crate) TableName, pub(crate) IngestRecord);

impl<S> FromRequest<S> for IngestPreprocess
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    /// Extract and validate a `POST /data` request.
    ///
    /// - Missing or empty `table` => `MissingTable` (400).
    /// - `table` outside the identifier allow-list => `InvalidTable` (400).
    /// - Body that is not a flat string-to-string JSON object => `InvalidBody` (400),
    ///   carrying the decoder message.
    ///
    /// The body is decoded regardless of `content-type`.
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let params = Query::<IngestParams>::try_from_uri(req.uri())
            .map(|Query(params)| params)
            .unwrap_or_default();
        let table = TableName::parse(&params.table)?;

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| GatewayError::BodyRead {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;
        let record: IngestRecord =
            serde_json::from_slice(&body).map_err(GatewayError::InvalidBody)?;

        debug!(
            table = %table,
            entries = record.len(),
            keys = ?record.keys().collect::<Vec<_>>(),
            "Extracted ingest record"
        );

        Ok(Self(table, record))
    }
}

//! Request body extractors.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

/// JSON body extractor for the recipe editor.
///
/// Unlike `axum::Json` it ignores the `Content-Type` header, and any read or
/// parse failure is answered with a bare 500 and an empty body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read request body");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        serde_json::from_slice(&bytes).map(Self).map_err(|e| {
            tracing::warn!(error = %e, "Malformed JSON body");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

//! Axum extractors for request bodies
//!
//! `ApiJson<T>` replaces `axum::Json<T>` on the CRUD endpoints so body
//! problems come back as the crate's own 400 error body instead of axum's
//! plain-text rejections.

use crate::core::error::{StackError, ValidationError};
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

/// JSON body extractor with crate-level error mapping
///
/// - an empty (or whitespace-only) body fails with `ValidationError::NoData`
/// - a body that does not parse as `T` fails with `ValidationError::InvalidJson`
///
/// The `Content-Type` header is not enforced.
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_user(
///     ApiJson(payload): ApiJson<UserPayload>,
/// ) -> Result<StatusCode, StackError> {
///     // payload parsed, ready for validation
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = StackError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            StackError::from(ValidationError::InvalidJson {
                message: e.body_text(),
            })
        })?;

        parse_body(&bytes).map(ApiJson)
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StackError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::NoData.into());
    }
    Ok(serde_json::from_slice(bytes)?)
}

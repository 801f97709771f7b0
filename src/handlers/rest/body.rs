use axum::{
    body::Bytes,
    extract::{FromRequest, Request, rejection::BytesRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::{UNHANDLED_ERROR, error_body};

/// JSON form body read the way browsers post forms.
///
/// A missing or non-JSON content type, an empty body, or a body whose shape
/// does not match all yield `T::default()`, so the request fails field
/// validation instead of being rejected here.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBody<T>(pub T);

#[derive(Debug, thiserror::Error)]
pub enum BodyRejection {
    #[error("Failed to read request body: {0}")]
    Read(#[from] BytesRejection),

    #[error("Failed to parse JSON body: {0}")]
    Syntax(serde_json::Error),
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        tracing::error!("Server error: {self}");
        error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            UNHANDLED_ERROR,
            Some(self.to_string()),
        )
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json" || essence.ends_with("+json")
}

impl<S, T> FromRequest<S> for FormBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json);

        let bytes = Bytes::from_request(req, state).await?;

        if !json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Self(value)),
            Err(e) if e.classify() == Category::Data => {
                tracing::warn!("Ignoring form body with unexpected shape: {e}");
                Ok(Self(T::default()))
            }
            Err(e) => Err(BodyRejection::Syntax(e)),
        }
    }
}

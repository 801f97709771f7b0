mod body;

pub use body::{BodyRejection, FormBody};

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::{any::Any, sync::Arc};

use crate::{
    dto::{AppointmentRequest, ContactRequest, Endpoints, ErrorResponse, IndexResponse},
    service::{RelayService, SubmissionError},
};

pub const APPOINTMENT_PATH: &str = "/api/book-appointment";
pub const CONTACT_PATH: &str = "/api/contact-us";

const SERVER_ERROR: &str = "Internal server error";
const UNHANDLED_ERROR: &str = "Something went wrong!";

fn error_body(status: StatusCode, error: &str, details: Option<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details,
        }),
    )
        .into_response()
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(e) => {
                tracing::warn!(form = ?e.form, "Rejected submission: {e}");
                error_body(StatusCode::BAD_REQUEST, e.message, None)
            }
            Self::Delivery(e) => {
                tracing::error!("Failed to relay submission: {e}");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_ERROR,
                    Some(e.to_string()),
                )
            }
        }
    }
}

/// Last-resort handler for panics escaping a request.
#[allow(clippy::needless_pass_by_value)]
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "Unknown panic message".to_string());

    tracing::error!("Server error: {details}");
    error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        UNHANDLED_ERROR,
        Some(details),
    )
}

#[debug_handler]
pub async fn root() -> Response {
    (
        StatusCode::OK,
        Json(IndexResponse {
            message: "Backend server is running".to_string(),
            endpoints: Endpoints {
                appointment: APPOINTMENT_PATH.to_string(),
                contact: CONTACT_PATH.to_string(),
            },
        }),
    )
        .into_response()
}

#[debug_handler]
pub async fn book_appointment(
    State(service): State<Arc<RelayService>>,
    FormBody(payload): FormBody<AppointmentRequest>,
) -> Response {
    match service.book_appointment(payload).await {
        Ok(r) => (StatusCode::OK, Json(r)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[debug_handler]
pub async fn contact_us(
    State(service): State<Arc<RelayService>>,
    FormBody(payload): FormBody<ContactRequest>,
) -> Response {
    match service.contact_us(payload).await {
        Ok(r) => (StatusCode::OK, Json(r)).into_response(),
        Err(e) => e.into_response(),
    }
}

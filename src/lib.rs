pub mod config;
pub mod dto;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod service;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use handlers::rest;
use service::RelayService;

pub fn router(service: Arc<RelayService>) -> Router {
    Router::new()
        .route("/", get(rest::root))
        .route(rest::APPOINTMENT_PATH, post(rest::book_appointment))
        .route(rest::CONTACT_PATH, post(rest::contact_us))
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(rest::handle_panic))
        .layer(TraceLayer::new_for_http())
}

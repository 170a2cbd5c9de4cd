// Library crate for the work log tracker
// Exports modules for use by the server and console binaries and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod manager;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{create_work_log, delete_work_log, list_work_logs, update_work_log};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(|| async { "Work log API is running" }))
        .route(
            "/api",
            get(list_work_logs)
                .post(create_work_log)
                .put(update_work_log)
                .delete(delete_work_log),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

//! Employee API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use super::AppState;

/// Employee router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1/employees", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/paginated", get(handler::list_paginated))
        .route("/health", get(handler::health))
        .route("/search", post(handler::search).get(handler::search_by_name))
        .route("/department/{department}", get(handler::by_department))
        .route("/position/{position}", get(handler::by_position))
        .route("/manager/{id}", get(handler::by_manager))
        .route("/top-level", get(handler::top_level))
        .route("/hired", get(handler::hired_between))
        .route("/salary", get(handler::salary_between))
        .route("/departments", get(handler::departments))
        .route("/departments/counts", get(handler::department_counts))
        .route("/positions", get(handler::positions))
        .route("/email-exists", get(handler::email_exists))
        .route(
            "/{id}",
            get(handler::get_by_id).put(handler::update).delete(handler::delete),
        )
}

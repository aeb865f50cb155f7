//! HTTP surface.

pub mod employees;
pub mod response;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::service::EmployeeService;

pub use response::{ApiResponse, AppResult};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub employees: EmployeeService,
}

impl AppState {
    pub fn new(employees: EmployeeService) -> Self {
        Self { employees }
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new().merge(employees::router())
}

/// Build the fully configured application with middleware and state.
pub fn build_app(state: AppState) -> Router {
    build_router()
        // Cross-origin requests from any frontend
        .layer(CorsLayer::permissive())
        // Request tracing (spans per request, logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

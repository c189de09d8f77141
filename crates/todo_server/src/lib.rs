//! HTTP task store.
//!
//! # Responsibility
//! - Expose create/list/update/delete over `/todos` as JSON.
//! - Translate service failures into status codes with `{message}` bodies.
//!
//! # Invariants
//! - Handlers never retry; each request maps to one storage operation.
//! - The storage handle arrives through `AppState`, never a global.

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, put};
use axum::Router;
use log::{error, info};
use std::time::Instant;
use tower_http::cors::CorsLayer;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiErrorResponse, ErrorBody};
pub use store::{StoreError, TaskStore};

/// Router state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: TaskStore,
}

impl AppState {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }
}

/// Builds the `/todos` router with permissive CORS and request logging.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/todos",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/todos/{id}",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        error!(
            "event=http_request module=http status=error method={method} path={path} code={} duration_ms={duration_ms}",
            status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=http status=ok method={method} path={path} code={} duration_ms={duration_ms}",
            status.as_u16()
        );
    }
    response
}

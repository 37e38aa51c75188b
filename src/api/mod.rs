mod error;
mod extractors;
mod handlers;

pub use error::ApiError;
pub use extractors::{NAME_HEADER, ROLE_HEADER};

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::DirectiveStore;

/// The store behind a lock: one writer at a time, every handler awaits its turn.
pub type SharedStore = Arc<Mutex<DirectiveStore>>;

pub fn shared(store: DirectiveStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}

pub fn create_router(store: SharedStore) -> Router {
    let api = Router::new()
        // Directives
        .route(
            "/directives",
            get(handlers::list_directives).post(handlers::create_directive),
        )
        .route(
            "/directives/{id}",
            get(handlers::get_directive).put(handlers::edit_directive),
        )
        .route(
            "/directives/{id}/actions",
            get(handlers::list_actions).post(handlers::apply_action),
        )
        // Dashboard
        .route("/stats", get(handlers::get_stats))
        .route("/reports/{dimension}", get(handlers::group_report))
        .route(
            "/reports/{dimension}/{group}/assignees",
            get(handlers::assignee_report),
        )
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(store)
}

//! Route table.

mod common;
mod users;

pub use common::common_routes;
pub use users::user_routes;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Maximum accepted JSON body; larger bodies are rejected by the extractor.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Full application: common routes at the root, users under `/api/users`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/users", user_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES)),
        )
}

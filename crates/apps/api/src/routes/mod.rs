pub mod internal;
pub mod reports;
pub mod root;

use crate::api_state::ApiContext;
use crate::internal::router::internal_router;
use crate::reports::router::reports_public_router;
use crate::root::router::root_public_router;
use axum::Router;

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Router {
    Router::new()
        .merge(root_public_router())
        .merge(reports_public_router())
        .merge(internal_router())
        .with_state(api_state)
}

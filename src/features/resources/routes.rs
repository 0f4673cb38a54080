use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::resources::{handlers, repositories::ResourceRepository};

/// Create routes for the resources feature
pub fn routes(repository: Arc<ResourceRepository>) -> Router {
    Router::new()
        .route(
            "/api/resources",
            post(handlers::create_resource).get(handlers::list_resources),
        )
        .route(
            "/api/resources/{id}",
            get(handlers::get_resource)
                .put(handlers::update_resource)
                .delete(handlers::delete_resource),
        )
        .with_state(repository)
}

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use crate::core::app::build_router;
use crate::core::config::{AppConfig, DatabaseConfig, SwaggerConfig};
use crate::core::database::Database;
use crate::features::resources::ResourceRepository;

/// Fresh, empty in-memory database with the schema applied
pub async fn test_database() -> Database {
    Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("failed to open in-memory database")
}

pub fn test_app_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["*".to_string()],
        max_request_body_size: 64 * 1024,
    }
}

/// Full application router over an in-memory database, plus a handle to
/// that database
pub async fn test_router() -> (Router, Database) {
    let db = test_database().await;
    let repository = Arc::new(ResourceRepository::new(db.clone()));
    let router = build_router(&test_app_config(), &SwaggerConfig::from_env(), repository);
    (router, db)
}

pub async fn test_server() -> TestServer {
    let (router, _) = test_router().await;
    TestServer::new(router).expect("failed to start test server")
}

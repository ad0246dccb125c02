mod common;

use ads_reporting::api::handlers::health_handler;
use axum::{Router, routing::get};
use axum_test::TestServer;
use sqlx::PgPool;

fn server(pool: PgPool) -> TestServer {
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_health_endpoint_success(pool: PgPool) {
    let server = server(pool);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert!(json["checks"]["database"].get("message").is_none());
}

#[sqlx::test]
async fn test_health_endpoint_structure(pool: PgPool) {
    let server = server(pool);

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["checks"].as_object().unwrap().len(), 1);
}

#[sqlx::test]
async fn test_health_reports_unreachable_database(pool: PgPool) {
    let server = server(pool.clone());
    pool.close().await;

    let response = server.get("/health").await;

    response.assert_status_service_unavailable();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}

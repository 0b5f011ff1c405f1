use actix_web::http::StatusCode;
use actix_web::test;
use hitlist::AppError;
use serde_json::Value;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn health_reports_db_migrations_and_notifier() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let app = create_test_app(env.state).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-trace-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["notifier"], "memory");
    assert!(body["migrations"]
        .as_str()
        .is_some_and(|v| v.starts_with('m')));
    Ok(())
}

#[actix_web::test]
async fn well_formed_trace_id_is_echoed() -> Result<(), AppError> {
    let env = build_test_state().await?;
    let app = create_test_app(env.state).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-trace-id", "client-abc_123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("x-trace-id").and_then(|v| v.to_str().ok()),
        Some("client-abc_123")
    );

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-trace-id", "has spaces; and junk"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let echoed = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(!echoed.is_empty());
    assert_ne!(echoed, "has spaces; and junk");
    Ok(())
}

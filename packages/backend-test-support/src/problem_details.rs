//! Problem Details assertions for route tests.
//!
//! Mirrors the backend's error body without depending on backend types, so
//! the wire contract is checked the way a client sees it.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Client-side view of an `application/problem+json` body.
#[derive(Debug, Clone, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Parse and check an error response.
///
/// Checks status, content type, `code`, that the body `trace_id` equals the
/// `x-trace-id` header and, when given, a detail substring. Returns the
/// parsed body for further assertions.
pub fn assert_problem_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    detail_contains: Option<&str>,
) -> Problem {
    assert_eq!(status, expected_status, "unexpected status");

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "expected problem+json, got {content_type:?}"
    );

    let problem: Problem = serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "body is not Problem Details ({e}): {}",
            String::from_utf8_lossy(body)
        )
    });

    let header_trace = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present");
    assert_eq!(
        problem.trace_id, header_trace,
        "trace_id in body should match x-trace-id header"
    );

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    if let Some(fragment) = detail_contains {
        assert!(
            problem.detail.contains(fragment),
            "expected detail to contain {fragment:?}, got {:?}",
            problem.detail
        );
    }
    problem
}

/// `assert_problem_parts` for an `actix_web::test::call_service` response.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
    detail_contains: Option<&str>,
) -> Problem {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;
    assert_problem_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_status,
        detail_contains,
    )
}

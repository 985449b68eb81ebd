use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::allocation::router::{allocate_handler, refresh_handler};
use crate::allocation::{allocation_router, AllocationService, SeverityPolicy};

fn post_json(uri: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serializable"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn allocate_handler_returns_result_payload() {
    let service = loaded_service(SeverityPolicy::Weighted);

    let response =
        allocate_handler::<FixtureLoader>(State(service), Ok(axum::Json(critical_submission(MUGDA))))
            .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["Assigned Hospital"], json!(DMCH));
    assert_eq!(body["Distance (KM)"], json!(3.2));
}

#[tokio::test]
async fn allocate_handler_rejects_bad_dates() {
    let service = loaded_service(SeverityPolicy::Weighted);
    let mut payload = submission(MUGDA);
    payload.date = "2026-7-1".to_string();

    let response = allocate_handler::<FixtureLoader>(State(service), Ok(axum::Json(payload))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["kind"], json!("InvalidDateFormat"));
}

#[tokio::test]
async fn refresh_handler_reports_loader_failure() {
    let service = Arc::new(AllocationService::new(
        Arc::new(FailingLoader),
        SeverityPolicy::Weighted,
    ));

    let response = refresh_handler::<FailingLoader>(State(service)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("failed to load forecast dataset"));
}

#[tokio::test]
async fn allocation_route_accepts_source_field_names() {
    let router = allocation_router(loaded_service(SeverityPolicy::Weighted));

    let response = router
        .oneshot(post_json(
            "/api/v1/allocations",
            json!({
                "hospital": "mugda general hospital",
                "date": "2026-07-03",
                "age": 30,
                "weight": 70.5,
                "platelet": 160000,
                "igg": "Negative",
                "igm": 0,
                "ns1": false
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["Outcome"], json!("AssignedHome"));
    assert_eq!(body["Assigned Hospital"], json!(MUGDA));
    assert_eq!(body["Hospital Tried"], json!("mugda general hospital"));
}

#[tokio::test]
async fn mistyped_fields_get_a_structured_rejection() {
    let router = allocation_router(loaded_service(SeverityPolicy::Weighted));

    let response = router
        .oneshot(post_json(
            "/api/v1/allocations",
            json!({
                "facility": MUGDA,
                "date": "2026-07-03",
                "age": 30,
                "weight": 70.5,
                "platelet_count": 45000.0,
                "igg": 0,
                "igm": 0,
                "ns1": 0
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["kind"], json!("InvalidPayload"));
    assert!(body["error"].as_str().is_some_and(|message| !message.is_empty()));
}

#[tokio::test]
async fn malformed_json_is_rejected_with_a_json_body() {
    let router = allocation_router(loaded_service(SeverityPolicy::Weighted));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/triage")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from("{\"facility\": "))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["kind"], json!("InvalidPayload"));
}

#[tokio::test]
async fn triage_route_returns_score_trail() {
    let router = allocation_router(loaded_service(SeverityPolicy::Weighted));

    let response = router
        .oneshot(post_json(
            "/api/v1/triage",
            serde_json::to_value(critical_submission(MUGDA)).expect("json"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["verdict"], json!("VerySevere"));
    assert_eq!(body["score"], json!(6.5));
    assert_eq!(body["components"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn facilities_and_summary_routes_describe_the_dataset() {
    let router = allocation_router(loaded_service(SeverityPolicy::Weighted));

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/v1/facilities")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(5));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/forecast")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    let body = json_body(response).await;
    assert_eq!(body["generation"], json!(1));
    assert_eq!(body["first_period"], json!({"year": 2026, "month": 7}));
}

#[tokio::test]
async fn refresh_route_bumps_generation() {
    let router = allocation_router(loaded_service(SeverityPolicy::Weighted));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/forecast/refresh")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["generation"], json!(2));
}

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::dataset::DatasetLoader;
use super::request::{AllocationRequestError, AllocationSubmission};
use super::service::AllocationService;

/// Router builder exposing allocation, triage and dataset endpoints.
pub fn allocation_router<L>(service: Arc<AllocationService<L>>) -> Router
where
    L: DatasetLoader + 'static,
{
    Router::new()
        .route("/api/v1/allocations", post(allocate_handler::<L>))
        .route("/api/v1/triage", post(triage_handler::<L>))
        .route("/api/v1/facilities", get(facilities_handler::<L>))
        .route("/api/v1/forecast", get(dataset_handler::<L>))
        .route("/api/v1/forecast/refresh", post(refresh_handler::<L>))
        .with_state(service)
}

/// Body that axum could not decode into a submission (bad JSON, wrong field types).
fn payload_rejection(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
        "kind": "InvalidPayload",
    });
    (rejection.status(), axum::Json(payload)).into_response()
}

fn rejection(error: AllocationRequestError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "kind": error.kind(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

pub(crate) async fn allocate_handler<L>(
    State(service): State<Arc<AllocationService<L>>>,
    payload: Result<axum::Json<AllocationSubmission>, JsonRejection>,
) -> Response
where
    L: DatasetLoader + 'static,
{
    let axum::Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return payload_rejection(rejection),
    };
    match service.allocate(&submission) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => rejection(error),
    }
}

pub(crate) async fn triage_handler<L>(
    State(service): State<Arc<AllocationService<L>>>,
    payload: Result<axum::Json<AllocationSubmission>, JsonRejection>,
) -> Response
where
    L: DatasetLoader + 'static,
{
    let axum::Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return payload_rejection(rejection),
    };
    match service.classify(&submission) {
        Ok(severity) => (StatusCode::OK, axum::Json(severity)).into_response(),
        Err(error) => rejection(error),
    }
}

pub(crate) async fn facilities_handler<L>(
    State(service): State<Arc<AllocationService<L>>>,
) -> Response
where
    L: DatasetLoader + 'static,
{
    (StatusCode::OK, axum::Json(service.facilities())).into_response()
}

pub(crate) async fn dataset_handler<L>(State(service): State<Arc<AllocationService<L>>>) -> Response
where
    L: DatasetLoader + 'static,
{
    let summary = service.dataset().summary();
    (StatusCode::OK, axum::Json(summary)).into_response()
}

pub(crate) async fn refresh_handler<L>(State(service): State<Arc<AllocationService<L>>>) -> Response
where
    L: DatasetLoader + 'static,
{
    match service.refresh() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use event_store::EventStoreError;
use projections::ProjectionError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Read model failure while applying an event or answering a query.
    Projection(ProjectionError),
    /// Event feed rejected the event.
    EventStore(EventStoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Projection(err) => projection_error_to_response(err),
            ApiError::EventStore(err) => event_store_error_to_response(err),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn projection_error_to_response(err: ProjectionError) -> (StatusCode, String) {
    match err {
        ProjectionError::EventStore(inner) => event_store_error_to_response(inner),
        ProjectionError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ProjectionError::SequenceGap { .. } | ProjectionError::InvalidTransition(_) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        ProjectionError::Deserialization(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        ProjectionError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn event_store_error_to_response(err: EventStoreError) -> (StatusCode, String) {
    match &err {
        EventStoreError::ConcurrencyConflict { .. } => (StatusCode::CONFLICT, err.to_string()),
        EventStoreError::InvalidAppend(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        EventStoreError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        ApiError::Projection(err)
    }
}

impl From<EventStoreError> for ApiError {
    fn from(err: EventStoreError) -> Self {
        ApiError::EventStore(err)
    }
}

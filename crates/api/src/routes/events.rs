//! Event ingestion from the upstream feed.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use event_store::{EventEnvelope, EventStore};
use serde::Serialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct PublishedEvent {
    pub event_id: String,
    pub aggregate_id: String,
    pub sequence_number: i64,
}

/// `POST /events` — records an event in the feed and applies it to the views.
///
/// An event the views reject (unknown courier or order, sequence gap,
/// backward transition) is not recorded, so the same sequence number can be
/// retried. The feed also rejects sequence numbers that do not directly
/// follow the aggregate's current one.
#[tracing::instrument(
    skip(state, envelope),
    fields(event_type = %envelope.event_type, aggregate_id = %envelope.aggregate_id)
)]
pub async fn publish<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(envelope): Json<EventEnvelope>,
) -> Result<(StatusCode, Json<PublishedEvent>), ApiError> {
    if envelope.event_type.trim().is_empty() || envelope.aggregate_type.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "event_type and aggregate_type are required".into(),
        ));
    }

    let _delivery = state.delivery.lock().await;

    let event_id = envelope.event_id.to_string();
    let aggregate_id = envelope.aggregate_id.to_string();
    let event_type = envelope.event_type.clone();
    let sequence = state.processor.publish(envelope).await?;

    metrics::counter!("api_events_published", "event_type" => event_type).increment(1);
    tracing::info!(sequence = %sequence, "event applied");

    Ok((
        StatusCode::ACCEPTED,
        Json(PublishedEvent {
            event_id,
            aggregate_id,
            sequence_number: sequence.as_i64(),
        }),
    ))
}

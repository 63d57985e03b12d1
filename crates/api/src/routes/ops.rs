//! Health, metrics and replay endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use event_store::EventStore;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};

use super::AppState;
use crate::error::ApiError;

/// `GET /health` — liveness plus read model sizes.
pub async fn health<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(json!({
        "status": "ok",
        "courier_orders": state.courier_orders.count().await?,
        "couriers": state.couriers.count().await,
    })))
}

/// `GET /metrics` — Prometheus text exposition.
pub async fn metrics(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// `POST /admin/replay` — clears the views and rebuilds them from the feed.
#[tracing::instrument(skip(state))]
pub async fn replay<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Value>, ApiError> {
    let _delivery = state.delivery.lock().await;
    state.processor.rebuild_all().await?;

    let courier_orders = state.courier_orders.count().await?;
    tracing::info!(courier_orders, "replay complete");

    Ok(Json(json!({
        "status": "replayed",
        "courier_orders": courier_orders,
        "couriers": state.couriers.count().await,
    })))
}

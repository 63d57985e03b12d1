//! HTTP API for the courier order read model.
//!
//! Accepts events from the feed, answers courier order queries, streams
//! live updates over server-sent events and exposes replay, health and
//! Prometheus endpoints.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use event_store::EventStore;
use metrics_exporter_prometheus::PrometheusHandle;
use projections::{
    CourierOrderView, CourierView, InMemoryCourierOrderStore, ProjectionProcessor, ProjectorConfig,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: EventStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::ops::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::ops::health::<S>))
        .route("/events", post(routes::events::publish::<S>))
        .route("/courier-orders/{id}", get(routes::courier_orders::get::<S>))
        .route(
            "/courier-orders/{id}/updates",
            get(routes::courier_orders::updates::<S>),
        )
        .route("/admin/replay", post(routes::ops::replay::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the courier and courier order views to a processor over
/// `event_store`.
///
/// The courier view is registered first so assignments can resolve the
/// couriers they reference.
pub fn create_default_state<S: EventStore + Clone + 'static>(
    event_store: S,
    config: ProjectorConfig,
) -> Arc<AppState<S>> {
    let couriers = CourierView::new();
    let courier_orders =
        CourierOrderView::with_store(InMemoryCourierOrderStore::new(), couriers.clone(), config);

    let mut processor = ProjectionProcessor::new(event_store.clone());
    processor.register(Box::new(couriers.clone()));
    processor.register(Box::new(courier_orders.clone()));

    Arc::new(AppState {
        event_store,
        processor: Arc::new(processor),
        courier_orders,
        couriers,
        delivery: Mutex::new(()),
    })
}

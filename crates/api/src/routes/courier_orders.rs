//! Courier order query and live update handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use event_store::EventStore;
use futures_util::{Stream, StreamExt, stream};
use projections::{CourierOrderModel, FindCourierOrder, SubscriptionQueryResult};

use super::AppState;
use crate::error::ApiError;

/// SSE event name carried by every courier order update.
pub const UPDATE_EVENT: &str = "courier-order";

/// `GET /courier-orders/{id}` — current view of one courier order.
#[tracing::instrument(skip(state))]
pub async fn get<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CourierOrderModel>, ApiError> {
    let order = state
        .courier_orders
        .find(&FindCourierOrder::new(parse_order_id(id)?))
        .await?;
    Ok(Json(order))
}

/// `GET /courier-orders/{id}/updates` — server-sent events for one order.
///
/// Sends the current view first when the order exists, then every update
/// the projector emits for it until the client disconnects.
#[tracing::instrument(skip(state))]
pub async fn updates<S: EventStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let SubscriptionQueryResult { initial, updates } = state
        .courier_orders
        .subscribe(&FindCourierOrder::new(parse_order_id(id)?))
        .await?;

    let events = stream::iter(initial)
        .chain(updates.into_stream())
        .map(|order| Event::default().event(UPDATE_EVENT).json_data(&order));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn parse_order_id(id: String) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::BadRequest("courier order id must not be empty".into()));
    }
    Ok(id)
}

//! Integration tests: event feed → ProjectionProcessor → courier and courier order views.

use domain::{CourierEvent, CourierOrderEvent, CourierOrderState, DomainEvent};
use event_store::{AppendOptions, EventEnvelope, EventStoreExt, InMemoryEventStore};
use projections::{
    CourierOrderView, CourierView, EntityKind, FindCourierOrder, ProjectionError,
    ProjectionProcessor,
};

/// Helper to set up the feed, processor and both views.
fn setup() -> (
    InMemoryEventStore,
    ProjectionProcessor<InMemoryEventStore>,
    CourierView,
    CourierOrderView,
) {
    let store = InMemoryEventStore::new();
    let couriers = CourierView::new();
    let orders = CourierOrderView::new(couriers.clone());

    let mut processor = ProjectionProcessor::new(store.clone());
    processor.register(Box::new(couriers.clone()));
    processor.register(Box::new(orders.clone()));

    (store, processor, couriers, orders)
}

async fn publish(store: &InMemoryEventStore, envelope: EventEnvelope) {
    store
        .append_event(envelope, AppendOptions::new())
        .await
        .unwrap();
}

async fn register_courier(store: &InMemoryEventStore, id: &str, first_name: &str) {
    publish(
        store,
        CourierEvent::courier_created(first_name, "Doe", 3)
            .to_envelope(id, 1)
            .unwrap(),
    )
    .await;
}

async fn publish_order(
    store: &InMemoryEventStore,
    id: &str,
    sequence: i64,
    event: CourierOrderEvent,
) {
    publish(store, event.to_envelope(id, sequence).unwrap()).await;
}

#[tokio::test]
async fn created_assigned_delivered_lifecycle() {
    let (store, processor, _, orders) = setup();

    register_courier(&store, "C1", "Ann").await;
    publish_order(&store, "O1", 1, CourierOrderEvent::OrderCreated).await;
    publish_order(&store, "O1", 2, CourierOrderEvent::order_assigned("C1")).await;
    publish_order(&store, "O1", 3, CourierOrderEvent::OrderDelivered).await;

    processor.run_catch_up().await.unwrap();

    let order = orders.find(&FindCourierOrder::new("O1")).await.unwrap();
    assert_eq!(order.state, CourierOrderState::Delivered);
    assert_eq!(order.aggregate_version.as_i64(), 3);
    let courier = order.courier.expect("delivered order keeps its courier");
    assert_eq!(courier.id.as_str(), "C1");
    assert_eq!(courier.first_name, "Ann");
}

#[tokio::test]
async fn assigned_order_query_scenario() {
    let (store, processor, _, orders) = setup();

    register_courier(&store, "C1", "Ann").await;
    publish_order(&store, "O1", 1, CourierOrderEvent::OrderCreated).await;
    publish_order(&store, "O1", 2, CourierOrderEvent::order_assigned("C1")).await;
    processor.run_catch_up().await.unwrap();

    let order = orders.find(&FindCourierOrder::new("O1")).await.unwrap();
    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["id"], "O1");
    assert_eq!(json["state"], "ASSIGNED");
    assert_eq!(json["courier"]["id"], "C1");
    assert_eq!(json["courier"]["first_name"], "Ann");
}

#[tokio::test]
async fn not_assigned_order_query_scenario() {
    let (store, processor, _, orders) = setup();

    publish_order(&store, "O2", 1, CourierOrderEvent::OrderCreated).await;
    publish_order(&store, "O2", 2, CourierOrderEvent::OrderNotAssigned).await;
    processor.run_catch_up().await.unwrap();

    let order = orders.find(&FindCourierOrder::new("O2")).await.unwrap();
    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["id"], "O2");
    assert_eq!(json["state"], "CREATED");
    assert!(json.get("courier").is_none());
}

#[tokio::test]
async fn assignment_to_unknown_courier_halts_processing() {
    let (store, processor, _, orders) = setup();

    publish_order(&store, "O1", 1, CourierOrderEvent::OrderCreated).await;
    publish_order(&store, "O1", 2, CourierOrderEvent::order_assigned("C9")).await;

    let err = processor.run_catch_up().await.unwrap_err();
    assert!(matches!(
        err,
        ProjectionError::NotFound { kind: EntityKind::Courier, ref id } if id.as_str() == "C9"
    ));

    let order = orders.find(&FindCourierOrder::new("O1")).await.unwrap();
    assert_eq!(order.state, CourierOrderState::Created);
    assert!(order.courier.is_none());
}

#[tokio::test]
async fn events_for_uncreated_order_are_not_found() {
    let (_, processor, _, _) = setup();

    let delivered = CourierOrderEvent::OrderDelivered
        .to_envelope("O404", 1)
        .unwrap();
    let err = processor.process_event(&delivered).await.unwrap_err();
    assert!(matches!(
        err,
        ProjectionError::NotFound { kind: EntityKind::Order, .. }
    ));
}

#[tokio::test]
async fn replay_rebuilds_identical_read_model() {
    let (store, processor, couriers, orders) = setup();

    register_courier(&store, "C1", "Ann").await;
    register_courier(&store, "C2", "Bob").await;
    publish_order(&store, "O1", 1, CourierOrderEvent::OrderCreated).await;
    publish_order(&store, "O2", 1, CourierOrderEvent::OrderCreated).await;
    publish_order(&store, "O1", 2, CourierOrderEvent::order_assigned("C2")).await;
    publish_order(&store, "O2", 2, CourierOrderEvent::OrderNotAssigned).await;
    processor.run_catch_up().await.unwrap();

    let before_o1 = orders.find(&FindCourierOrder::new("O1")).await.unwrap();
    let before_o2 = orders.find(&FindCourierOrder::new("O2")).await.unwrap();

    processor.rebuild_all().await.unwrap();

    assert_eq!(
        orders.find(&FindCourierOrder::new("O1")).await.unwrap(),
        before_o1
    );
    assert_eq!(
        orders.find(&FindCourierOrder::new("O2")).await.unwrap(),
        before_o2
    );
    assert_eq!(couriers.count().await, 2);
}

#[tokio::test]
async fn reset_then_query_is_not_found() {
    use projections::Projection;

    let (store, processor, _, orders) = setup();
    publish_order(&store, "O1", 1, CourierOrderEvent::OrderCreated).await;
    processor.run_catch_up().await.unwrap();

    orders.reset().await.unwrap();
    orders.reset().await.unwrap();

    let err = orders
        .find(&FindCourierOrder::new("O1"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(orders.count().await.unwrap(), 0);
}

#[tokio::test]
async fn live_subscription_follows_processed_events() {
    let (store, processor, _, orders) = setup();

    register_courier(&store, "C1", "Ann").await;
    publish_order(&store, "O1", 1, CourierOrderEvent::OrderCreated).await;
    processor.run_catch_up().await.unwrap();

    let subscription = orders
        .subscribe(&FindCourierOrder::new("O1"))
        .await
        .unwrap();
    assert_eq!(
        subscription.initial.unwrap().state,
        CourierOrderState::Created
    );
    let mut updates = subscription.updates;

    let assigned = CourierOrderEvent::order_assigned("C1")
        .to_envelope("O1", 2)
        .unwrap();
    store
        .append_event(assigned.clone(), AppendOptions::new())
        .await
        .unwrap();
    processor.process_event(&assigned).await.unwrap();

    let update = updates.next().await.unwrap();
    assert_eq!(update.state, CourierOrderState::Assigned);
    assert_eq!(update.courier.unwrap().first_name, "Ann");
}

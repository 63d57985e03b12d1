use criterion::{Criterion, criterion_group, criterion_main};
use domain::{CourierEvent, CourierOrderEvent, DomainEvent};
use event_store::{AppendOptions, EventStoreExt, InMemoryEventStore};
use projections::{
    CourierOrderView, CourierView, FindCourierOrder, Projection, ProjectionProcessor,
};

/// Populates a store with one courier and N orders taken through
/// created, assigned and delivered.
async fn populate_store(store: &InMemoryEventStore, n: usize) {
    store
        .append_event(
            CourierEvent::courier_created("Ann", "Lee", 10)
                .to_envelope("C1", 1)
                .unwrap(),
            AppendOptions::new(),
        )
        .await
        .unwrap();

    for i in 0..n {
        let order_id = format!("O{i}");
        let events = vec![
            CourierOrderEvent::OrderCreated
                .to_envelope(order_id.as_str(), 1)
                .unwrap(),
            CourierOrderEvent::order_assigned("C1")
                .to_envelope(order_id.as_str(), 2)
                .unwrap(),
            CourierOrderEvent::OrderDelivered
                .to_envelope(order_id.as_str(), 3)
                .unwrap(),
        ];
        store.append(events, AppendOptions::new()).await.unwrap();
    }
}

fn processor_for(
    store: InMemoryEventStore,
) -> (ProjectionProcessor<InMemoryEventStore>, CourierOrderView) {
    let couriers = CourierView::new();
    let orders = CourierOrderView::new(couriers.clone());
    let mut processor = ProjectionProcessor::new(store);
    processor.register(Box::new(couriers) as Box<dyn Projection>);
    processor.register(Box::new(orders.clone()) as Box<dyn Projection>);
    (processor, orders)
}

fn bench_catch_up_1000_orders(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryEventStore::new();
    rt.block_on(populate_store(&store, 1000));

    c.bench_function("projections/catch_up_3001_events", |b| {
        b.iter(|| {
            rt.block_on(async {
                let (processor, _) = processor_for(store.clone());
                processor.run_catch_up().await.unwrap();
            });
        });
    });
}

fn bench_find_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryEventStore::new();
    let (processor, orders) = processor_for(store.clone());
    rt.block_on(async {
        populate_store(&store, 1000).await;
        processor.run_catch_up().await.unwrap();
    });
    let query = FindCourierOrder::new("O500");

    c.bench_function("projections/find_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                orders.find(&query).await.unwrap();
            });
        });
    });
}

fn bench_update_with_subscribers(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryEventStore::new();
    let (processor, orders) = processor_for(store.clone());
    let subscriptions = rt.block_on(async {
        populate_store(&store, 100).await;
        processor.run_catch_up().await.unwrap();
        let mut subscriptions = Vec::new();
        for i in 0..100 {
            let query = FindCourierOrder::new(format!("O{i}"));
            subscriptions.push(orders.subscribe(&query).await.unwrap());
        }
        subscriptions
    });
    let mut sequence = 3;

    c.bench_function("projections/not_assigned_with_100_subscriptions", |b| {
        b.iter(|| {
            sequence += 1;
            rt.block_on(async {
                let envelope = CourierOrderEvent::OrderNotAssigned
                    .to_envelope("O42", sequence)
                    .unwrap();
                orders.handle(&envelope).await.unwrap();
            });
        });
    });
    drop(subscriptions);
}

fn bench_rebuild_100_orders(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryEventStore::new();
    rt.block_on(populate_store(&store, 100));
    let (processor, _) = processor_for(store);

    c.bench_function("projections/rebuild_301_events", |b| {
        b.iter(|| {
            rt.block_on(async {
                processor.rebuild_all().await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_catch_up_1000_orders,
    bench_find_order,
    bench_update_with_subscribers,
    bench_rebuild_100_orders,
);
criterion_main!(benches);

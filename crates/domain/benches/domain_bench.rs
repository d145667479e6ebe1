use chrono::Utc;
use common::AggregateId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    AssignRoute, BookCargo, BookingService, Cargo, CargoEvent, DomainEvent, HandlingActivity,
    Location, RegisterHandlingEvent, RegisteredRoutes, VoyageNumber, reconstruct,
};
use event_store::{AppendOptions, EventEnvelope, EventStore, InMemoryEventStore, Version};

fn make_envelope(aggregate_id: AggregateId, version: u64, event: &CargoEvent) -> EventEnvelope {
    EventEnvelope::builder()
        .aggregate_id(aggregate_id)
        .aggregate_type("Cargo")
        .event_type(event.event_type())
        .version(Version::new(version))
        .payload(event)
        .unwrap()
        .build()
        .unwrap()
}

fn service() -> BookingService<InMemoryEventStore, RegisteredRoutes> {
    BookingService::new(InMemoryEventStore::new(), RegisteredRoutes::standard())
}

/// A booked cargo followed by `changes` alternating destination changes and
/// route assignments.
fn history(tracking_id: AggregateId, changes: u64) -> Vec<EventEnvelope> {
    let routes = RegisteredRoutes::standard();
    let route = routes.get(Location::Hongkong, Location::Stockholm)[0].clone();

    let booked = CargoEvent::cargo_booked(
        tracking_id,
        Location::Hongkong,
        Location::Stockholm,
        Utc::now(),
    );
    let mut envelopes = vec![make_envelope(tracking_id, 0, &booked)];
    for v in 1..=changes {
        let event = if v % 2 == 0 {
            CargoEvent::route_assigned(route.clone())
        } else {
            CargoEvent::destination_changed(Location::Stockholm)
        };
        envelopes.push(make_envelope(tracking_id, v, &event));
    }
    envelopes
}

fn bench_book_cargo(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/book_cargo", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = service();
                let cmd = BookCargo::new(Location::Hongkong, Location::Stockholm, Utc::now());
                service.book_new_cargo(cmd).await.unwrap();
            });
        });
    });
}

fn bench_full_journey(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let steps = [
        (None, Location::Hongkong, HandlingActivity::Receive),
        (Some("V1"), Location::Hongkong, HandlingActivity::Load),
        (Some("V1"), Location::NewYork, HandlingActivity::Unload),
        (Some("V2"), Location::NewYork, HandlingActivity::Load),
        (Some("V2"), Location::Stockholm, HandlingActivity::Unload),
        (None, Location::Stockholm, HandlingActivity::Claim),
    ];

    c.bench_function("domain/book_route_handle_claim", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = service();
                let cmd = BookCargo::new(Location::Hongkong, Location::Stockholm, Utc::now());
                let tracking_id = cmd.tracking_id;
                service.book_new_cargo(cmd).await.unwrap();

                let routes = service.request_possible_routes(tracking_id).await.unwrap();
                service
                    .assign_route(AssignRoute::new(tracking_id, routes[0].clone()))
                    .await
                    .unwrap();

                for (voyage, location, activity) in steps {
                    service
                        .register_handling_event(RegisterHandlingEvent::new(
                            tracking_id,
                            voyage.map(VoyageNumber::from),
                            location,
                            activity,
                        ))
                        .await
                        .unwrap();
                }
            });
        });
    });
}

fn bench_reconstruct(c: &mut Criterion) {
    let envelopes = history(AggregateId::new(), 99);

    c.bench_function("domain/reconstruct_100_events", |b| {
        b.iter(|| {
            let cargo: Cargo = reconstruct(envelopes.clone()).unwrap();
            cargo
        });
    });
}

fn bench_load_from_store(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = service();
    let tracking_id = AggregateId::new();

    rt.block_on(async {
        service
            .handler()
            .store()
            .append(history(tracking_id, 49), AppendOptions::expect_new())
            .await
            .unwrap();
    });

    c.bench_function("domain/load_50_events", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.get_cargo(tracking_id).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_book_cargo,
    bench_full_journey,
    bench_reconstruct,
    bench_load_from_store,
);
criterion_main!(benches);

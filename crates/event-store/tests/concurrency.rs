//! Optimistic concurrency behaviour of the in-memory event log under
//! concurrent writers.

use std::sync::Arc;

use common::AggregateId;
use event_store::{
    AppendOptions, EventEnvelope, EventStore, EventStoreError, InMemoryEventStore, Version,
};

fn event(aggregate_id: AggregateId, version: u64, writer: usize) -> EventEnvelope {
    EventEnvelope::builder()
        .aggregate_id(aggregate_id)
        .aggregate_type("Cargo")
        .event_type("DestinationChanged")
        .version(Version::new(version))
        .payload_raw(serde_json::json!({ "writer": writer }))
        .build()
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_writers_get_at_most_one_success_per_version() {
    let store = Arc::new(InMemoryEventStore::new());
    let aggregate_id = AggregateId::new();

    store
        .append(vec![event(aggregate_id, 0, 0)], AppendOptions::expect_new())
        .await
        .unwrap();

    let mut handles = Vec::new();
    for writer in 1..=8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .append(
                    vec![event(aggregate_id, 1, writer)],
                    AppendOptions::expect_version(Version::new(1)),
                )
                .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(version) => {
                assert_eq!(version, Version::new(2));
                successes += 1;
            }
            Err(EventStoreError::ConcurrencyConflict { actual, .. }) => {
                assert_eq!(actual, Version::new(2));
                conflicts += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.replay(aggregate_id).await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn retrying_loser_succeeds_after_rereading_version() {
    let store = InMemoryEventStore::new();
    let aggregate_id = AggregateId::new();

    store
        .append(vec![event(aggregate_id, 0, 0)], AppendOptions::expect_new())
        .await
        .unwrap();
    store
        .append(
            vec![event(aggregate_id, 1, 1)],
            AppendOptions::expect_version(Version::new(1)),
        )
        .await
        .unwrap();

    let stale = store
        .append(
            vec![event(aggregate_id, 1, 2)],
            AppendOptions::expect_version(Version::new(1)),
        )
        .await;
    assert!(matches!(
        stale,
        Err(EventStoreError::ConcurrencyConflict { .. })
    ));

    let current = store.current_version(aggregate_id).await.unwrap();
    let retried = store
        .append(
            vec![event(aggregate_id, current.as_u64(), 2)],
            AppendOptions::expect_version(current),
        )
        .await
        .unwrap();
    assert_eq!(retried, Version::new(3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_aggregates_do_not_contend() {
    let store = Arc::new(InMemoryEventStore::new());

    let mut handles = Vec::new();
    for writer in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let aggregate_id = AggregateId::new();
            store
                .append(
                    vec![event(aggregate_id, 0, writer), event(aggregate_id, 1, writer)],
                    AppendOptions::expect_new(),
                )
                .await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), Version::new(2));
    }
    assert_eq!(store.event_count().await, 32);
}

#[tokio::test]
async fn versions_are_gap_free_and_increasing() {
    let store = InMemoryEventStore::new();
    let aggregate_id = AggregateId::new();

    for version in 0..5 {
        store
            .append(
                vec![event(aggregate_id, version, 0)],
                AppendOptions::expect_version(Version::new(version)),
            )
            .await
            .unwrap();
    }

    let versions: Vec<u64> = store
        .replay(aggregate_id)
        .await
        .unwrap()
        .iter()
        .map(|e| e.version.as_u64())
        .collect();
    assert_eq!(versions, vec![0, 1, 2, 3, 4]);
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    AggregateId, EventEnvelope, EventStoreError, Result, Version,
    store::{AppendOptions, EventStore, EventStream, validate_events_for_append},
};

#[derive(Debug, Default)]
struct Log {
    /// Per-aggregate streams, each ordered by version.
    streams: HashMap<AggregateId, Vec<EventEnvelope>>,
    /// Every event in global append order.
    all: Vec<EventEnvelope>,
}

/// In-memory event store.
///
/// Cloning shares the underlying log, so a clone handed to a projection
/// processor sees everything the command side appends.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    log: Arc<RwLock<Log>>,
}

impl InMemoryEventStore {
    /// Creates a new empty in-memory event store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored.
    pub async fn event_count(&self) -> usize {
        self.log.read().await.all.len()
    }

    /// Clears all events.
    pub async fn clear(&self) {
        let mut log = self.log.write().await;
        log.streams.clear();
        log.all.clear();
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, events: Vec<EventEnvelope>, options: AppendOptions) -> Result<Version> {
        validate_events_for_append(&events)?;

        let aggregate_id = events[0].aggregate_id;
        let first_version = events[0].version;

        let mut log = self.log.write().await;
        let current_version =
            Version::new(log.streams.get(&aggregate_id).map_or(0, |s| s.len() as u64));

        if let Some(expected) = options.expected_version
            && current_version != expected
        {
            metrics::counter!("event_store_concurrency_conflicts_total").increment(1);
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected,
                actual: current_version,
            });
        }

        // The first event must land exactly on the next free slot.
        if first_version < current_version {
            metrics::counter!("event_store_concurrency_conflicts_total").increment(1);
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected: first_version,
                actual: current_version,
            });
        }
        if first_version > current_version {
            return Err(EventStoreError::InvalidAppend(format!(
                "aggregate {aggregate_id} is at version {current_version}, cannot append at {first_version}"
            )));
        }

        let count = events.len() as u64;
        let new_version = Version::new(current_version.as_u64() + count);

        log.all.extend(events.iter().cloned());
        log.streams.entry(aggregate_id).or_default().extend(events);

        metrics::counter!("event_store_appends_total").increment(count);
        tracing::debug!(%aggregate_id, %new_version, count, "events appended");

        Ok(new_version)
    }

    async fn replay(&self, aggregate_id: AggregateId) -> Result<Vec<EventEnvelope>> {
        let log = self.log.read().await;
        Ok(log.streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn current_version(&self, aggregate_id: AggregateId) -> Result<Version> {
        let log = self.log.read().await;
        Ok(Version::new(
            log.streams.get(&aggregate_id).map_or(0, |s| s.len() as u64),
        ))
    }

    async fn stream_all_events(&self) -> Result<EventStream> {
        use futures_util::stream;

        let events = self.log.read().await.all.clone();
        Ok(Box::pin(stream::iter(events.into_iter().map(Ok))))
    }
}

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::{AggregateId, EventEnvelope, EventStoreError, Result, Version};

/// Options for appending events to the store.
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Stream length the caller observed before computing its events.
    /// If None, no version check is performed.
    pub expected_version: Option<Version>,
}

impl AppendOptions {
    /// Creates options with no version check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects the aggregate's stream to hold exactly `version` events.
    pub fn expect_version(version: Version) -> Self {
        Self {
            expected_version: Some(version),
        }
    }

    /// Expects the aggregate not to exist yet.
    pub fn expect_new() -> Self {
        Self::expect_version(Version::initial())
    }
}

/// A stream of events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<EventEnvelope>> + Send>>;

/// Append-only event log.
///
/// Events of one aggregate are totally ordered by version with no gaps.
/// Different aggregates are independent; nothing orders them relative to
/// each other except the global append order seen by `stream_all_events`.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends events for a single aggregate.
    ///
    /// The batch is stored atomically: either every event is appended or
    /// none is. With `options.expected_version` set, the append fails with
    /// `ConcurrencyConflict` unless the stream length equals it.
    ///
    /// Returns the aggregate's new version (its stream length).
    async fn append(&self, events: Vec<EventEnvelope>, options: AppendOptions) -> Result<Version>;

    /// Returns all events of an aggregate ordered by version.
    ///
    /// An unknown aggregate yields an empty sequence.
    async fn replay(&self, aggregate_id: AggregateId) -> Result<Vec<EventEnvelope>>;

    /// Returns the aggregate's current version, which is 0 when it has no events.
    async fn current_version(&self, aggregate_id: AggregateId) -> Result<Version>;

    /// Streams every stored event in global append order.
    async fn stream_all_events(&self) -> Result<EventStream>;
}

/// Extension trait providing convenience methods for event stores.
#[async_trait]
pub trait EventStoreExt: EventStore {
    /// Appends a single event at `expected_version`.
    async fn append_event(
        &self,
        event: EventEnvelope,
        expected_version: Version,
    ) -> Result<Version> {
        self.append(vec![event], AppendOptions::expect_version(expected_version))
            .await
    }

    /// Checks if an aggregate exists (has any events).
    async fn aggregate_exists(&self, aggregate_id: AggregateId) -> Result<bool> {
        Ok(self.current_version(aggregate_id).await? > Version::initial())
    }
}

impl<T: EventStore + ?Sized> EventStoreExt for T {}

/// Validates a batch before appending: non-empty, one aggregate, and
/// consecutive versions.
pub fn validate_events_for_append(events: &[EventEnvelope]) -> Result<()> {
    let Some(first) = events.first() else {
        return Err(EventStoreError::InvalidAppend(
            "cannot append an empty event list".to_string(),
        ));
    };

    let mut expected_version = first.version;
    for event in events.iter().skip(1) {
        if event.aggregate_id != first.aggregate_id || event.aggregate_type != first.aggregate_type
        {
            return Err(EventStoreError::InvalidAppend(
                "all events must belong to the same aggregate".to_string(),
            ));
        }

        expected_version = expected_version.next();
        if event.version != expected_version {
            return Err(EventStoreError::InvalidAppend(format!(
                "event versions must be consecutive: expected {}, got {}",
                expected_version, event.version
            )));
        }
    }

    Ok(())
}

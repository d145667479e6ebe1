//! Domain error types.

use common::AggregateId;
use event_store::{EventStoreError, Version};
use thiserror::Error;

use crate::cargo::{CargoError, Location};

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// A cargo command was rejected.
    #[error("Cargo error: {0}")]
    Cargo(#[from] CargoError),

    /// The referenced aggregate has no events.
    #[error("{aggregate_type} not found: {aggregate_id}")]
    NotFound {
        aggregate_type: &'static str,
        aggregate_id: AggregateId,
    },

    /// The routing table has no itinerary for the requested pair.
    #[error("No route found from {from} to {to}")]
    NoRouteFound { from: Location, to: Location },

    /// A stored stream skipped or repeated a version.
    #[error("Event stream of {aggregate_id} is out of order: expected version {expected}, found {found}")]
    OutOfOrderEvent {
        aggregate_id: AggregateId,
        expected: Version,
        found: Version,
    },

    /// A stored event contradicts the state built from the events before it.
    #[error("Stored event {version} of {aggregate_id} cannot be applied: {source}")]
    InvalidStoredEvent {
        aggregate_id: AggregateId,
        version: Version,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// True when the command lost an optimistic concurrency race and may be
    /// retried after re-reading the aggregate.
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::EventStore(EventStoreError::ConcurrencyConflict { .. })
        )
    }
}

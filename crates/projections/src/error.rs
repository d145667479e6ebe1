//! Projection error types.

use common::AggregateId;
use domain::CargoError;
use event_store::Version;
use thiserror::Error;

/// Errors that can occur during projection processing.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] event_store::EventStoreError),

    /// Failed to deserialize an event payload.
    #[error("Event deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// An event arrived ahead of the ones before it in its stream.
    #[error("{projection} expected version {expected} of {aggregate_id}, got {found}")]
    VersionGap {
        projection: &'static str,
        aggregate_id: AggregateId,
        expected: Version,
        found: Version,
    },

    /// An event contradicts the state the projection has built so far.
    #[error("{projection} cannot apply version {version} of {aggregate_id}: {source}")]
    InvalidEvent {
        projection: &'static str,
        aggregate_id: AggregateId,
        version: Version,
        #[source]
        source: CargoError,
    },
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;

//! Client error types.

use common::ParseAggregateIdError;
use domain::{CargoError, DomainError};
use thiserror::Error;

/// Errors returned by the client interface.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The tracking id is not a valid id.
    #[error(transparent)]
    InvalidTrackingId(#[from] ParseAggregateIdError),

    /// A location or activity code could not be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CargoError),

    /// The booking service rejected the call.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The itinerary is not among the routes currently offered for the cargo.
    #[error("Itinerary is not an offered route for cargo {tracking_id}")]
    RouteNotOffered { tracking_id: String },

    /// The itinerary selector chose nothing.
    #[error("No itinerary selected for cargo {tracking_id}")]
    NoItinerarySelected { tracking_id: String },

    /// The route table file could not be loaded.
    #[error("Failed to load route table: {0}")]
    RouteTable(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Projection(#[from] projections::ProjectionError),
}

impl ClientError {
    /// Returns true if the call lost an optimistic concurrency race.
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, ClientError::Domain(err) if err.is_concurrency_conflict())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

//! Cargo aggregate and related types.

mod aggregate;
mod commands;
mod events;
pub mod handling;
mod service;
mod state;
mod value_objects;

pub use aggregate::Cargo;
pub use commands::*;
pub use events::{
    CargoBookedData, CargoEvent, DestinationChangedData, HandlingEventRegisteredData,
    RouteAssignedData, estimated_transit_time,
};
pub use service::BookingService;
pub use state::{RoutingStatus, TransportStatus};
pub use value_objects::{
    HandlingActivity, Itinerary, Leg, Location, NextExpectedActivity, VoyageNumber,
};

use common::AggregateId;
use thiserror::Error;

/// Errors that can occur during cargo operations.
#[derive(Debug, Error)]
pub enum CargoError {
    /// A cargo with this tracking id was already booked.
    #[error("Cargo already booked: {tracking_id}")]
    AlreadyBooked { tracking_id: AggregateId },

    /// The cargo has not been booked yet.
    #[error("Cargo has not been booked")]
    NotBooked,

    /// Handling was reported before any route was assigned.
    #[error("No route assigned")]
    NoRouteAssigned,

    /// Handling was reported after the cargo was claimed.
    #[error("Cargo already claimed{}", describe_id(.tracking_id))]
    AlreadyClaimed { tracking_id: Option<AggregateId> },

    /// The handling report does not fit any leg of the assigned route.
    #[error(
        "No leg of the assigned route matches {activity} at {location} on voyage {}",
        describe_voyage(.voyage_number)
    )]
    LegNotFound {
        activity: HandlingActivity,
        location: Location,
        voyage_number: Option<VoyageNumber>,
    },

    /// Activity code is not one of RECEIVE, LOAD, UNLOAD, CLAIM.
    #[error("Unsupported handling activity: {0}")]
    UnsupportedActivity(String),

    /// Location code is not a known port.
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// Legs do not form a path from origin to destination.
    #[error("Invalid itinerary: {0}")]
    InvalidItinerary(String),
}

fn describe_id(tracking_id: &Option<AggregateId>) -> String {
    tracking_id
        .map(|id| format!(": {id}"))
        .unwrap_or_default()
}

fn describe_voyage(voyage_number: &Option<VoyageNumber>) -> &str {
    voyage_number.as_ref().map_or("<none>", VoyageNumber::as_str)
}

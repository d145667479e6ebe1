//! Cargo commands.

use chrono::{DateTime, Utc};
use common::AggregateId;

use crate::command::Command;

use super::{Cargo, HandlingActivity, Itinerary, Location, VoyageNumber};

/// Command to book a new cargo.
#[derive(Debug, Clone)]
pub struct BookCargo {
    /// The tracking id to assign.
    pub tracking_id: AggregateId,

    pub origin: Location,

    pub destination: Location,

    pub arrival_deadline: DateTime<Utc>,
}

impl BookCargo {
    /// Creates a new BookCargo command with a generated tracking id.
    pub fn new(origin: Location, destination: Location, arrival_deadline: DateTime<Utc>) -> Self {
        Self {
            tracking_id: AggregateId::new(),
            origin,
            destination,
            arrival_deadline,
        }
    }

    /// Uses the given tracking id instead of a generated one.
    pub fn with_tracking_id(mut self, tracking_id: AggregateId) -> Self {
        self.tracking_id = tracking_id;
        self
    }
}

impl Command for BookCargo {
    type Aggregate = Cargo;

    fn aggregate_id(&self) -> AggregateId {
        self.tracking_id
    }
}

/// Command to change a cargo's destination.
#[derive(Debug, Clone)]
pub struct ChangeDestination {
    pub tracking_id: AggregateId,

    /// The new destination.
    pub destination: Location,
}

impl ChangeDestination {
    /// Creates a new ChangeDestination command.
    pub fn new(tracking_id: AggregateId, destination: Location) -> Self {
        Self {
            tracking_id,
            destination,
        }
    }
}

impl Command for ChangeDestination {
    type Aggregate = Cargo;

    fn aggregate_id(&self) -> AggregateId {
        self.tracking_id
    }
}

/// Command to assign an itinerary to a cargo.
#[derive(Debug, Clone)]
pub struct AssignRoute {
    pub tracking_id: AggregateId,

    /// The itinerary to follow.
    pub itinerary: Itinerary,
}

impl AssignRoute {
    /// Creates a new AssignRoute command.
    pub fn new(tracking_id: AggregateId, itinerary: Itinerary) -> Self {
        Self {
            tracking_id,
            itinerary,
        }
    }
}

impl Command for AssignRoute {
    type Aggregate = Cargo;

    fn aggregate_id(&self) -> AggregateId {
        self.tracking_id
    }
}

/// Command to record a handling report.
#[derive(Debug, Clone)]
pub struct RegisterHandlingEvent {
    pub tracking_id: AggregateId,

    /// Voyage involved, if any.
    pub voyage_number: Option<VoyageNumber>,

    pub location: Location,

    pub activity: HandlingActivity,
}

impl RegisterHandlingEvent {
    /// Creates a new RegisterHandlingEvent command.
    pub fn new(
        tracking_id: AggregateId,
        voyage_number: Option<VoyageNumber>,
        location: Location,
        activity: HandlingActivity,
    ) -> Self {
        Self {
            tracking_id,
            voyage_number,
            location,
            activity,
        }
    }
}

impl Command for RegisterHandlingEvent {
    type Aggregate = Cargo;

    fn aggregate_id(&self) -> AggregateId {
        self.tracking_id
    }
}

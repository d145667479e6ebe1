//! Cargo domain events.

use chrono::{DateTime, Duration, Utc};
use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{HandlingActivity, Itinerary, Location, VoyageNumber};

/// Events that can occur on a cargo aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CargoEvent {
    /// Cargo was booked.
    CargoBooked(CargoBookedData),

    /// The customer asked for a different final destination.
    DestinationChanged(DestinationChangedData),

    /// An itinerary was chosen for the cargo.
    RouteAssigned(RouteAssignedData),

    /// A physical handling step was reported.
    HandlingEventRegistered(HandlingEventRegisteredData),
}

impl DomainEvent for CargoEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CargoEvent::CargoBooked(_) => "CargoBooked",
            CargoEvent::DestinationChanged(_) => "DestinationChanged",
            CargoEvent::RouteAssigned(_) => "RouteAssigned",
            CargoEvent::HandlingEventRegistered(_) => "HandlingEventRegistered",
        }
    }
}

/// Data for CargoBooked event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoBookedData {
    /// The tracking id of the new cargo.
    pub tracking_id: AggregateId,

    pub origin: Location,

    pub destination: Location,

    /// Latest acceptable arrival at the destination.
    pub arrival_deadline: DateTime<Utc>,

    /// When the booking was made.
    pub booked_at: DateTime<Utc>,
}

/// Data for DestinationChanged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationChangedData {
    /// The new destination.
    pub destination: Location,
}

/// Data for RouteAssigned event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAssignedData {
    /// The itinerary the cargo will follow.
    pub route: Itinerary,

    /// Arrival estimate recorded when the route was assigned.
    pub estimated_time_of_arrival: DateTime<Utc>,

    /// When the route was assigned.
    pub assigned_at: DateTime<Utc>,
}

/// Data for HandlingEventRegistered event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlingEventRegisteredData {
    /// Voyage involved, if any. RECEIVE and CLAIM usually carry none.
    pub voyage_number: Option<VoyageNumber>,

    /// Where the handling took place.
    pub location: Location,

    pub activity: HandlingActivity,

    /// When the handling was registered.
    pub registered_at: DateTime<Utc>,
}

impl HandlingEventRegisteredData {
    /// Creates a handling report registered now.
    pub fn new(
        voyage_number: Option<VoyageNumber>,
        location: Location,
        activity: HandlingActivity,
    ) -> Self {
        Self {
            voyage_number,
            location,
            activity,
            registered_at: Utc::now(),
        }
    }
}

/// How far ahead of route assignment the arrival estimate is placed.
pub fn estimated_transit_time() -> Duration {
    Duration::weeks(1)
}

// Helper constructors for events
impl CargoEvent {
    /// Creates a CargoBooked event.
    pub fn cargo_booked(
        tracking_id: AggregateId,
        origin: Location,
        destination: Location,
        arrival_deadline: DateTime<Utc>,
    ) -> Self {
        CargoEvent::CargoBooked(CargoBookedData {
            tracking_id,
            origin,
            destination,
            arrival_deadline,
            booked_at: Utc::now(),
        })
    }

    /// Creates a DestinationChanged event.
    pub fn destination_changed(destination: Location) -> Self {
        CargoEvent::DestinationChanged(DestinationChangedData { destination })
    }

    /// Creates a RouteAssigned event, estimating arrival one transit time
    /// from now.
    pub fn route_assigned(route: Itinerary) -> Self {
        let assigned_at = Utc::now();
        CargoEvent::RouteAssigned(RouteAssignedData {
            route,
            estimated_time_of_arrival: assigned_at + estimated_transit_time(),
            assigned_at,
        })
    }

    /// Creates a HandlingEventRegistered event.
    pub fn handling_event_registered(
        voyage_number: Option<VoyageNumber>,
        location: Location,
        activity: HandlingActivity,
    ) -> Self {
        CargoEvent::HandlingEventRegistered(HandlingEventRegisteredData::new(
            voyage_number,
            location,
            activity,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cargo::Leg;

    #[test]
    fn events_are_adjacently_tagged() {
        let event = CargoEvent::destination_changed(Location::Aumel);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "DestinationChanged");
        assert_eq!(json["data"]["destination"], "AUMEL");
        assert_eq!(event.event_type(), "DestinationChanged");
    }

    #[test]
    fn route_assigned_carries_its_arrival_estimate() {
        let route = Itinerary::new(
            Location::Tokyo,
            Location::Hamburg,
            vec![Leg::new(Location::Tokyo, Location::Hamburg, "V3")],
        )
        .unwrap();

        let CargoEvent::RouteAssigned(data) = CargoEvent::route_assigned(route) else {
            panic!("expected RouteAssigned");
        };
        assert_eq!(
            data.estimated_time_of_arrival - data.assigned_at,
            Duration::weeks(1)
        );
    }

    #[test]
    fn handling_event_deserializes_without_voyage() {
        let json = serde_json::json!({
            "type": "HandlingEventRegistered",
            "data": {
                "voyage_number": null,
                "location": "HONGKONG",
                "activity": "RECEIVE",
                "registered_at": "2024-01-01T00:00:00Z"
            }
        });

        let event: CargoEvent = serde_json::from_value(json).unwrap();
        match event {
            CargoEvent::HandlingEventRegistered(data) => {
                assert!(data.voyage_number.is_none());
                assert_eq!(data.activity, HandlingActivity::Receive);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}

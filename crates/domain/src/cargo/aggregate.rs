//! Cargo aggregate implementation.

use chrono::{DateTime, Utc};
use common::AggregateId;
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

use super::{
    CargoError, CargoEvent, HandlingActivity, Itinerary, Location, NextExpectedActivity,
    RoutingStatus, TransportStatus, VoyageNumber,
    events::{CargoBookedData, HandlingEventRegisteredData, RouteAssignedData},
    handling::{self, HandlingOutcome},
};

/// Cargo aggregate root.
///
/// A booked shipment tracked from its origin to its destination. All state
/// is derived from the cargo's events; the tracking id is the aggregate id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    /// Tracking id, set by the booking event.
    id: Option<AggregateId>,

    /// Number of events applied.
    #[serde(default)]
    version: Version,

    origin: Option<Location>,

    destination: Option<Location>,

    arrival_deadline: Option<DateTime<Utc>>,

    transport_status: TransportStatus,

    routing_status: RoutingStatus,

    is_misdirected: bool,

    estimated_time_of_arrival: Option<DateTime<Utc>>,

    next_expected_activity: Option<NextExpectedActivity>,

    /// The currently assigned itinerary.
    route: Option<Itinerary>,

    last_known_location: Option<Location>,

    /// Voyage the cargo is on, only while onboard a carrier.
    current_voyage_number: Option<VoyageNumber>,
}

impl Aggregate for Cargo {
    type Event = CargoEvent;
    type Error = CargoError;

    fn aggregate_type() -> &'static str {
        "Cargo"
    }

    fn id(&self) -> Option<AggregateId> {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        if let Err(error) = self.try_apply(event) {
            // Events appended by this aggregate's own commands always fit.
            tracing::error!(
                tracking_id = ?self.id,
                version = %self.version,
                %error,
                "event does not fit the cargo, state left unchanged"
            );
        }
    }

    fn try_apply(&mut self, event: Self::Event) -> Result<(), Self::Error> {
        match event {
            CargoEvent::CargoBooked(data) => self.apply_cargo_booked(data),
            CargoEvent::DestinationChanged(data) => {
                self.destination = Some(data.destination);
            }
            CargoEvent::RouteAssigned(data) => self.apply_route_assigned(data),
            CargoEvent::HandlingEventRegistered(data) => {
                let outcome = handling::transition(self, &data)?;
                self.apply_outcome(outcome);
            }
        }
        Ok(())
    }
}

// Query methods
impl Cargo {
    /// Returns the tracking id, None before booking.
    pub fn tracking_id(&self) -> Option<AggregateId> {
        self.id
    }

    /// Returns true once the booking event has been applied.
    pub fn is_booked(&self) -> bool {
        self.id.is_some()
    }

    pub fn origin(&self) -> Option<Location> {
        self.origin
    }

    pub fn destination(&self) -> Option<Location> {
        self.destination
    }

    pub fn arrival_deadline(&self) -> Option<DateTime<Utc>> {
        self.arrival_deadline
    }

    pub fn transport_status(&self) -> TransportStatus {
        self.transport_status
    }

    pub fn routing_status(&self) -> RoutingStatus {
        self.routing_status
    }

    pub fn is_misdirected(&self) -> bool {
        self.is_misdirected
    }

    pub fn estimated_time_of_arrival(&self) -> Option<DateTime<Utc>> {
        self.estimated_time_of_arrival
    }

    pub fn next_expected_activity(&self) -> Option<&NextExpectedActivity> {
        self.next_expected_activity.as_ref()
    }

    pub fn route(&self) -> Option<&Itinerary> {
        self.route.as_ref()
    }

    pub fn last_known_location(&self) -> Option<Location> {
        self.last_known_location
    }

    pub fn current_voyage_number(&self) -> Option<&VoyageNumber> {
        self.current_voyage_number.as_ref()
    }

    /// Where a new route has to start from: the last place the cargo was
    /// seen, or its origin if it was never handled.
    pub fn route_search_origin(&self) -> Option<Location> {
        self.last_known_location.or(self.origin)
    }

    /// The pair to search itineraries for: where the cargo is now and where
    /// it is going.
    pub fn route_request(&self) -> Result<(Location, Location), CargoError> {
        self.route_search_origin()
            .zip(self.destination)
            .ok_or(CargoError::NotBooked)
    }
}

// Command methods (return events)
impl Cargo {
    /// Books a new cargo.
    pub fn book(
        &self,
        tracking_id: AggregateId,
        origin: Location,
        destination: Location,
        arrival_deadline: DateTime<Utc>,
    ) -> Result<Vec<CargoEvent>, CargoError> {
        if let Some(existing) = self.id {
            return Err(CargoError::AlreadyBooked {
                tracking_id: existing,
            });
        }

        Ok(vec![CargoEvent::cargo_booked(
            tracking_id,
            origin,
            destination,
            arrival_deadline,
        )])
    }

    /// Changes the final destination.
    ///
    /// Neither the route nor the next expected activity is recomputed; the
    /// caller is expected to request and assign a new route if needed.
    pub fn change_destination(&self, destination: Location) -> Result<Vec<CargoEvent>, CargoError> {
        self.ensure_booked()?;
        Ok(vec![CargoEvent::destination_changed(destination)])
    }

    /// Assigns an itinerary.
    ///
    /// The itinerary is not checked against the cargo's origin or
    /// destination; picking a sensible one is up to the caller.
    pub fn assign_route(&self, route: Itinerary) -> Result<Vec<CargoEvent>, CargoError> {
        self.ensure_booked()?;
        Ok(vec![CargoEvent::route_assigned(route)])
    }

    /// Registers a handling report.
    ///
    /// The report is run through the handling state machine first, so a
    /// report that does not fit the route is rejected before anything is
    /// recorded.
    pub fn register_handling_event(
        &self,
        voyage_number: Option<VoyageNumber>,
        location: Location,
        activity: HandlingActivity,
    ) -> Result<Vec<CargoEvent>, CargoError> {
        self.ensure_booked()?;

        let data = HandlingEventRegisteredData::new(voyage_number, location, activity);
        let outcome = handling::transition(self, &data)?;
        if outcome.is_misdirected && !self.is_misdirected {
            tracing::warn!(
                tracking_id = ?self.id,
                %location,
                %activity,
                "cargo unloaded off its route"
            );
        }

        Ok(vec![CargoEvent::HandlingEventRegistered(data)])
    }

    fn ensure_booked(&self) -> Result<(), CargoError> {
        if self.is_booked() {
            Ok(())
        } else {
            Err(CargoError::NotBooked)
        }
    }
}

// Apply event helpers
impl Cargo {
    fn apply_cargo_booked(&mut self, data: CargoBookedData) {
        self.id = Some(data.tracking_id);
        self.origin = Some(data.origin);
        self.destination = Some(data.destination);
        self.arrival_deadline = Some(data.arrival_deadline);
        self.transport_status = TransportStatus::NotReceived;
        self.routing_status = RoutingStatus::NotRouted;
    }

    fn apply_route_assigned(&mut self, data: RouteAssignedData) {
        self.route = Some(data.route);
        self.routing_status = RoutingStatus::Routed;
        self.estimated_time_of_arrival = Some(data.estimated_time_of_arrival);
        self.is_misdirected = false;
        self.next_expected_activity = self
            .origin
            .map(|origin| NextExpectedActivity::at(HandlingActivity::Receive, origin));
    }

    fn apply_outcome(&mut self, outcome: HandlingOutcome) {
        self.transport_status = outcome.transport_status;
        self.last_known_location = outcome.last_known_location;
        self.current_voyage_number = outcome.current_voyage_number;
        self.is_misdirected = outcome.is_misdirected;
        self.next_expected_activity = outcome.next_expected_activity;
    }
}

//! Client interface over the booking service, in simple types.

use chrono::{DateTime, Utc};
use common::AggregateId;
use domain::{
    AssignRoute, BookCargo, BookingService, Cargo, CargoError, ChangeDestination,
    HandlingActivity, Itinerary, Location, NextExpectedActivity, RegisterHandlingEvent,
    RoutingService, VoyageNumber,
};
use event_store::EventStore;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// One leg of an offered itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegDetails {
    pub origin: String,
    pub destination: String,
    pub voyage_number: String,
}

/// An itinerary as presented to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryDetails {
    pub origin: String,
    pub destination: String,
    pub legs: Vec<LegDetails>,
}

impl From<&Itinerary> for ItineraryDetails {
    fn from(itinerary: &Itinerary) -> Self {
        Self {
            origin: itinerary.origin().to_string(),
            destination: itinerary.destination().to_string(),
            legs: itinerary
                .legs()
                .iter()
                .map(|leg| LegDetails {
                    origin: leg.origin.to_string(),
                    destination: leg.destination.to_string(),
                    voyage_number: leg.voyage_number.to_string(),
                })
                .collect(),
        }
    }
}

/// The next expected activity as a tuple: `(activity, location)` or
/// `(activity, location, voyage)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedActivity {
    Pair(String, String),
    Triple(String, String, String),
}

impl ExpectedActivity {
    pub fn pair(activity: &str, location: &str) -> Self {
        ExpectedActivity::Pair(activity.to_string(), location.to_string())
    }

    pub fn triple(activity: &str, location: &str, voyage: &str) -> Self {
        ExpectedActivity::Triple(
            activity.to_string(),
            location.to_string(),
            voyage.to_string(),
        )
    }
}

impl From<&NextExpectedActivity> for ExpectedActivity {
    fn from(next: &NextExpectedActivity) -> Self {
        let activity = next.activity.to_string();
        let location = next.location.to_string();
        match &next.voyage_number {
            Some(voyage) => ExpectedActivity::Triple(activity, location, voyage.to_string()),
            None => ExpectedActivity::Pair(activity, location),
        }
    }
}

/// Snapshot of every attribute of a cargo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoDetails {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub arrival_deadline: DateTime<Utc>,
    pub transport_status: String,
    pub routing_status: String,
    pub is_misdirected: bool,
    pub estimated_time_of_arrival: Option<DateTime<Utc>>,
    pub next_expected_activity: Option<ExpectedActivity>,
    pub route: Option<ItineraryDetails>,
    pub last_known_location: Option<String>,
    pub current_voyage_number: Option<String>,
}

impl TryFrom<&Cargo> for CargoDetails {
    type Error = CargoError;

    fn try_from(cargo: &Cargo) -> std::result::Result<Self, Self::Error> {
        let id = cargo.tracking_id().ok_or(CargoError::NotBooked)?;
        let origin = cargo.origin().ok_or(CargoError::NotBooked)?;
        let destination = cargo.destination().ok_or(CargoError::NotBooked)?;
        let arrival_deadline = cargo.arrival_deadline().ok_or(CargoError::NotBooked)?;

        Ok(Self {
            id: id.to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            arrival_deadline,
            transport_status: cargo.transport_status().as_str().to_string(),
            routing_status: cargo.routing_status().as_str().to_string(),
            is_misdirected: cargo.is_misdirected(),
            estimated_time_of_arrival: cargo.estimated_time_of_arrival(),
            next_expected_activity: cargo.next_expected_activity().map(ExpectedActivity::from),
            route: cargo.route().map(ItineraryDetails::from),
            last_known_location: cargo.last_known_location().map(|l| l.to_string()),
            current_voyage_number: cargo.current_voyage_number().map(|v| v.to_string()),
        })
    }
}

/// Picks one itinerary out of those offered for a cargo.
pub trait ItinerarySelector {
    fn select<'a>(&self, itineraries: &'a [ItineraryDetails]) -> Option<&'a ItineraryDetails>;
}

/// Always picks the first offered itinerary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstItinerary;

impl ItinerarySelector for FirstItinerary {
    fn select<'a>(&self, itineraries: &'a [ItineraryDetails]) -> Option<&'a ItineraryDetails> {
        itineraries.first()
    }
}

fn parse_tracking_id(tracking_id: &str) -> Result<AggregateId> {
    Ok(tracking_id.parse()?)
}

/// Client for the booking service that deals in strings, booleans and
/// timestamps.
pub struct LocalClient<S: EventStore, R: RoutingService> {
    service: BookingService<S, R>,
}

impl<S: EventStore, R: RoutingService> LocalClient<S, R> {
    pub fn new(service: BookingService<S, R>) -> Self {
        Self { service }
    }

    /// Returns the wrapped booking service.
    pub fn service(&self) -> &BookingService<S, R> {
        &self.service
    }

    /// Books a new cargo and returns its tracking id.
    pub async fn book_new_cargo(
        &self,
        origin: &str,
        destination: &str,
        arrival_deadline: DateTime<Utc>,
    ) -> Result<String> {
        let origin: Location = origin.parse()?;
        let destination: Location = destination.parse()?;

        let cmd = BookCargo::new(origin, destination, arrival_deadline);
        let tracking_id = cmd.tracking_id;
        self.service.book_new_cargo(cmd).await?;
        Ok(tracking_id.to_string())
    }

    pub async fn get_cargo_details(&self, tracking_id: &str) -> Result<CargoDetails> {
        let cargo = self.service.get_cargo(parse_tracking_id(tracking_id)?).await?;
        Ok(CargoDetails::try_from(&cargo)?)
    }

    pub async fn change_destination(&self, tracking_id: &str, destination: &str) -> Result<()> {
        let cmd = ChangeDestination::new(parse_tracking_id(tracking_id)?, destination.parse()?);
        self.service.change_destination(cmd).await?;
        Ok(())
    }

    /// Lists the itineraries currently offered for a cargo.
    pub async fn request_possible_routes_for_cargo(
        &self,
        tracking_id: &str,
    ) -> Result<Vec<ItineraryDetails>> {
        let routes = self
            .service
            .request_possible_routes(parse_tracking_id(tracking_id)?)
            .await?;
        Ok(routes.iter().map(ItineraryDetails::from).collect())
    }

    /// Assigns the offered itinerary equal to `route_details`.
    pub async fn assign_route(&self, tracking_id: &str, route_details: &ItineraryDetails) -> Result<()> {
        let id = parse_tracking_id(tracking_id)?;
        let routes = self.service.request_possible_routes(id).await?;

        let itinerary = routes
            .into_iter()
            .find(|route| ItineraryDetails::from(route) == *route_details)
            .ok_or_else(|| ClientError::RouteNotOffered {
                tracking_id: tracking_id.to_string(),
            })?;

        self.service
            .assign_route(AssignRoute::new(id, itinerary))
            .await?;
        Ok(())
    }

    /// Requests the offered routes, lets `selector` choose, and assigns the
    /// choice. Returns the assigned itinerary.
    pub async fn route_cargo(
        &self,
        tracking_id: &str,
        selector: &impl ItinerarySelector,
    ) -> Result<ItineraryDetails> {
        let offered = self.request_possible_routes_for_cargo(tracking_id).await?;
        let chosen = selector
            .select(&offered)
            .cloned()
            .ok_or_else(|| ClientError::NoItinerarySelected {
                tracking_id: tracking_id.to_string(),
            })?;

        self.assign_route(tracking_id, &chosen).await?;
        Ok(chosen)
    }

    pub async fn register_handling_event(
        &self,
        tracking_id: &str,
        voyage_number: Option<&str>,
        location: &str,
        handling_activity: &str,
    ) -> Result<()> {
        let activity: HandlingActivity = handling_activity.parse()?;
        let cmd = RegisterHandlingEvent::new(
            parse_tracking_id(tracking_id)?,
            voyage_number.map(VoyageNumber::from),
            location.parse()?,
            activity,
        );
        self.service.register_handling_event(cmd).await?;
        Ok(())
    }
}

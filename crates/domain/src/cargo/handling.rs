//! Handling state machine.
//!
//! Each registered handling event moves the cargo along its assigned
//! itinerary. The machine indexes directly into the itinerary's legs:
//!
//! ```text
//! RECEIVE ──► LOAD ──► UNLOAD ─┬─► LOAD ...     (next leg)
//!                              ├─► CLAIM        (at destination)
//!                              └─► misdirected  (off route, needs a new route)
//! ```

use super::{
    Cargo, CargoError, HandlingActivity, Location, NextExpectedActivity, TransportStatus,
    VoyageNumber, events::HandlingEventRegisteredData,
};
use crate::aggregate::Aggregate;

/// Cargo fields written by a handling event.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlingOutcome {
    pub transport_status: TransportStatus,
    pub last_known_location: Option<Location>,
    pub current_voyage_number: Option<VoyageNumber>,
    pub is_misdirected: bool,
    pub next_expected_activity: Option<NextExpectedActivity>,
}

impl HandlingOutcome {
    fn unchanged(cargo: &Cargo) -> Self {
        Self {
            transport_status: cargo.transport_status(),
            last_known_location: cargo.last_known_location(),
            current_voyage_number: cargo.current_voyage_number().cloned(),
            is_misdirected: cargo.is_misdirected(),
            next_expected_activity: cargo.next_expected_activity().cloned(),
        }
    }
}

/// Computes the cargo fields that result from `event`.
///
/// Pure: the same cargo and event always give the same outcome. Commands call
/// it to validate a handling report before anything is appended, and `apply`
/// calls it again to mutate.
pub fn transition(
    cargo: &Cargo,
    event: &HandlingEventRegisteredData,
) -> Result<HandlingOutcome, CargoError> {
    let route = cargo.route().ok_or(CargoError::NoRouteAssigned)?;
    if cargo.transport_status().is_terminal() {
        return Err(CargoError::AlreadyClaimed {
            tracking_id: cargo.id(),
        });
    }

    let location = event.location;
    let off_route = cargo.is_misdirected();
    let leg_not_found = || CargoError::LegNotFound {
        activity: event.activity,
        location,
        voyage_number: event.voyage_number.clone(),
    };

    let mut next = HandlingOutcome::unchanged(cargo);

    match event.activity {
        HandlingActivity::Receive => {
            next.transport_status = TransportStatus::InPort;
            next.last_known_location = Some(location);
            next.current_voyage_number = None;
            next.next_expected_activity = Some(NextExpectedActivity::on_voyage(
                HandlingActivity::Load,
                location,
                route.first_leg().voyage_number.clone(),
            ));
        }
        HandlingActivity::Load => {
            next.transport_status = TransportStatus::OnboardCarrier;
            next.current_voyage_number = event.voyage_number.clone();
            let leg = event
                .voyage_number
                .as_ref()
                .and_then(|voyage| route.leg_departing(location, voyage))
                .ok_or_else(leg_not_found)?;
            if !off_route {
                next.next_expected_activity = Some(NextExpectedActivity::on_voyage(
                    HandlingActivity::Unload,
                    leg.destination,
                    leg.voyage_number.clone(),
                ));
            }
        }
        HandlingActivity::Unload => {
            next.transport_status = TransportStatus::InPort;
            next.last_known_location = Some(location);
            next.current_voyage_number = None;
            if off_route {
                // stays misdirected until rerouted
            } else if cargo.destination() == Some(location) {
                next.next_expected_activity =
                    Some(NextExpectedActivity::at(HandlingActivity::Claim, location));
            } else if route.arrives_at(location) {
                let next_leg = event
                    .voyage_number
                    .as_ref()
                    .and_then(|voyage| route.leg_after(voyage))
                    .filter(|leg| leg.origin == location)
                    .ok_or_else(leg_not_found)?;
                next.next_expected_activity = Some(NextExpectedActivity::on_voyage(
                    HandlingActivity::Load,
                    location,
                    next_leg.voyage_number.clone(),
                ));
            } else {
                next.is_misdirected = true;
            }
        }
        HandlingActivity::Claim => {
            next.transport_status = TransportStatus::Claimed;
            next.current_voyage_number = None;
            next.next_expected_activity = None;
        }
    }

    if next.is_misdirected {
        next.next_expected_activity = None;
    }

    Ok(next)
}

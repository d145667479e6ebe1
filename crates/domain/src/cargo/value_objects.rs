//! Value objects for the cargo domain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CargoError;

/// A known port.
///
/// The set is closed: routing data and handling reports may only refer to
/// these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Location {
    Hamburg,
    Hongkong,
    NewYork,
    Stockholm,
    Tokyo,
    /// Rotterdam, used for bookings only.
    Nlrtm,
    /// Dallas, used for bookings only.
    Usdal,
    /// Melbourne, used for bookings only.
    Aumel,
}

impl Location {
    /// Every known location.
    pub const ALL: [Location; 8] = [
        Location::Hamburg,
        Location::Hongkong,
        Location::NewYork,
        Location::Stockholm,
        Location::Tokyo,
        Location::Nlrtm,
        Location::Usdal,
        Location::Aumel,
    ];

    /// Returns the upper-case location code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Hamburg => "HAMBURG",
            Location::Hongkong => "HONGKONG",
            Location::NewYork => "NEWYORK",
            Location::Stockholm => "STOCKHOLM",
            Location::Tokyo => "TOKYO",
            Location::Nlrtm => "NLRTM",
            Location::Usdal => "USDAL",
            Location::Aumel => "AUMEL",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = CargoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .into_iter()
            .find(|location| location.as_str() == s)
            .ok_or_else(|| CargoError::UnknownLocation(s.to_string()))
    }
}

/// Identifier of a scheduled voyage, such as "V1".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoyageNumber(String);

impl VoyageNumber {
    /// Creates a new voyage number.
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Returns the voyage number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoyageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoyageNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VoyageNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One transport segment travelled on a single voyage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg {
    pub origin: Location,
    pub destination: Location,
    pub voyage_number: VoyageNumber,
}

impl Leg {
    /// Creates a new leg.
    pub fn new(
        origin: Location,
        destination: Location,
        voyage_number: impl Into<VoyageNumber>,
    ) -> Self {
        Self {
            origin,
            destination,
            voyage_number: voyage_number.into(),
        }
    }
}

/// A planned route for a cargo: a contiguous chain of legs from `origin` to
/// `destination`.
///
/// Construction validates the chain, so any `Itinerary` value (including a
/// deserialized one) has at least one leg, starts at its origin, ends at its
/// destination, and has no breaks between legs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ItineraryData")]
pub struct Itinerary {
    origin: Location,
    destination: Location,
    legs: Vec<Leg>,
}

#[derive(Deserialize)]
struct ItineraryData {
    origin: Location,
    destination: Location,
    legs: Vec<Leg>,
}

impl TryFrom<ItineraryData> for Itinerary {
    type Error = CargoError;

    fn try_from(data: ItineraryData) -> Result<Self, Self::Error> {
        Itinerary::new(data.origin, data.destination, data.legs)
    }
}

impl Itinerary {
    /// Creates an itinerary, checking that the legs form a path from
    /// `origin` to `destination`.
    pub fn new(
        origin: Location,
        destination: Location,
        legs: Vec<Leg>,
    ) -> Result<Self, CargoError> {
        let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
            return Err(CargoError::InvalidItinerary(
                "an itinerary needs at least one leg".to_string(),
            ));
        };

        if first.origin != origin {
            return Err(CargoError::InvalidItinerary(format!(
                "first leg departs from {} but the itinerary starts at {origin}",
                first.origin
            )));
        }
        if last.destination != destination {
            return Err(CargoError::InvalidItinerary(format!(
                "last leg arrives at {} but the itinerary ends at {destination}",
                last.destination
            )));
        }
        if let Some(pair) = legs
            .windows(2)
            .find(|pair| pair[0].destination != pair[1].origin)
        {
            return Err(CargoError::InvalidItinerary(format!(
                "leg arriving at {} is followed by a leg departing from {}",
                pair[0].destination, pair[1].origin
            )));
        }

        Ok(Self {
            origin,
            destination,
            legs,
        })
    }

    /// Builds an itinerary from legs already known to form a valid path.
    pub(crate) fn from_parts(origin: Location, destination: Location, legs: Vec<Leg>) -> Self {
        debug_assert!(Self::new(origin, destination, legs.clone()).is_ok());
        Self {
            origin,
            destination,
            legs,
        }
    }

    pub fn origin(&self) -> Location {
        self.origin
    }

    pub fn destination(&self) -> Location {
        self.destination
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the first leg. Never fails, an itinerary always has one.
    pub fn first_leg(&self) -> &Leg {
        &self.legs[0]
    }

    /// Finds the leg departing from `location` on `voyage_number`.
    pub fn leg_departing(&self, location: Location, voyage_number: &VoyageNumber) -> Option<&Leg> {
        self.legs
            .iter()
            .find(|leg| leg.origin == location && &leg.voyage_number == voyage_number)
    }

    /// True if some leg of the itinerary arrives at `location`.
    pub fn arrives_at(&self, location: Location) -> bool {
        self.legs.iter().any(|leg| leg.destination == location)
    }

    /// Returns the leg that follows the one travelled on `voyage_number`.
    pub fn leg_after(&self, voyage_number: &VoyageNumber) -> Option<&Leg> {
        let index = self
            .legs
            .iter()
            .position(|leg| &leg.voyage_number == voyage_number)?;
        self.legs.get(index + 1)
    }
}

/// Physical handling step reported for a cargo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HandlingActivity {
    Receive,
    Load,
    Unload,
    Claim,
}

impl HandlingActivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlingActivity::Receive => "RECEIVE",
            HandlingActivity::Load => "LOAD",
            HandlingActivity::Unload => "UNLOAD",
            HandlingActivity::Claim => "CLAIM",
        }
    }
}

impl fmt::Display for HandlingActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlingActivity {
    type Err = CargoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEIVE" => Ok(HandlingActivity::Receive),
            "LOAD" => Ok(HandlingActivity::Load),
            "UNLOAD" => Ok(HandlingActivity::Unload),
            "CLAIM" => Ok(HandlingActivity::Claim),
            other => Err(CargoError::UnsupportedActivity(other.to_string())),
        }
    }
}

/// The handling step the cargo is expected to undergo next.
///
/// RECEIVE and CLAIM carry no voyage; LOAD and UNLOAD name the voyage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextExpectedActivity {
    pub activity: HandlingActivity,
    pub location: Location,
    pub voyage_number: Option<VoyageNumber>,
}

impl NextExpectedActivity {
    /// An expected activity with no voyage.
    pub fn at(activity: HandlingActivity, location: Location) -> Self {
        Self {
            activity,
            location,
            voyage_number: None,
        }
    }

    /// An expected activity on a specific voyage.
    pub fn on_voyage(
        activity: HandlingActivity,
        location: Location,
        voyage_number: VoyageNumber,
    ) -> Self {
        Self {
            activity,
            location,
            voyage_number: Some(voyage_number),
        }
    }
}

impl fmt::Display for NextExpectedActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.voyage_number {
            Some(voyage) => write!(f, "({}, {}, {voyage})", self.activity, self.location),
            None => write!(f, "({}, {})", self.activity, self.location),
        }
    }
}

//! Route lookup used when a cargo needs an itinerary.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::cargo::{Itinerary, Leg, Location};
use crate::error::DomainError;

/// Finds candidate itineraries between two locations.
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Returns every itinerary from `from` to `to`, in preference order.
    ///
    /// Fails with `NoRouteFound` if none is known.
    async fn find_routes(&self, from: Location, to: Location) -> Result<Vec<Itinerary>, DomainError>;
}

/// Fixed table of itineraries keyed by their end points.
#[derive(Debug, Clone, Default)]
pub struct RegisteredRoutes {
    routes: HashMap<(Location, Location), Vec<Itinerary>>,
}

impl RegisteredRoutes {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table: HONGKONG to STOCKHOLM via NEWYORK, and TOKYO to
    /// STOCKHOLM via HAMBURG.
    pub fn standard() -> Self {
        let mut routes = Self::new();
        routes.register(Itinerary::from_parts(
            Location::Hongkong,
            Location::Stockholm,
            vec![
                Leg::new(Location::Hongkong, Location::NewYork, "V1"),
                Leg::new(Location::NewYork, Location::Stockholm, "V2"),
            ],
        ));
        routes.register(Itinerary::from_parts(
            Location::Tokyo,
            Location::Stockholm,
            vec![
                Leg::new(Location::Tokyo, Location::Hamburg, "V3"),
                Leg::new(Location::Hamburg, Location::Stockholm, "V4"),
            ],
        ));
        routes
    }

    /// Parses a JSON array of itineraries.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let itineraries: Vec<Itinerary> = serde_json::from_str(json)?;
        Ok(itineraries.into_iter().collect())
    }

    /// Reads a JSON array of itineraries from a file.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(std::io::Error::other)
    }

    /// Adds an itinerary under its origin and destination.
    pub fn register(&mut self, itinerary: Itinerary) {
        self.routes
            .entry((itinerary.origin(), itinerary.destination()))
            .or_default()
            .push(itinerary);
    }

    /// Adds an itinerary, builder style.
    pub fn with_route(mut self, itinerary: Itinerary) -> Self {
        self.register(itinerary);
        self
    }

    /// Returns the itineraries registered for a pair.
    pub fn get(&self, from: Location, to: Location) -> &[Itinerary] {
        self.routes.get(&(from, to)).map_or(&[], Vec::as_slice)
    }

    /// Total number of registered itineraries.
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<Itinerary> for RegisteredRoutes {
    fn from_iter<I: IntoIterator<Item = Itinerary>>(iter: I) -> Self {
        let mut routes = Self::new();
        for itinerary in iter {
            routes.register(itinerary);
        }
        routes
    }
}

#[async_trait]
impl RoutingService for RegisteredRoutes {
    async fn find_routes(&self, from: Location, to: Location) -> Result<Vec<Itinerary>, DomainError> {
        let found = self.get(from, to);
        if found.is_empty() {
            tracing::debug!(%from, %to, "no registered route");
            return Err(DomainError::NoRouteFound { from, to });
        }
        Ok(found.to_vec())
    }
}

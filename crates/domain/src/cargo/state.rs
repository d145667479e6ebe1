//! Transport and routing status of a cargo.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the cargo physically is in its journey.
///
/// ```text
/// NotReceived ──► InPort ◄──► OnboardCarrier
///                   │
///                   └──► Claimed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportStatus {
    /// Booked but not yet handed over at the origin.
    #[default]
    NotReceived,

    /// Sitting in a port between legs.
    InPort,

    /// Loaded on a vessel.
    OnboardCarrier,

    /// Picked up by the consignee (terminal state).
    Claimed,
}

impl TransportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportStatus::NotReceived => "NOT_RECEIVED",
            TransportStatus::InPort => "IN_PORT",
            TransportStatus::OnboardCarrier => "ONBOARD_CARRIER",
            TransportStatus::Claimed => "CLAIMED",
        }
    }

    /// Returns true once no further handling may be registered.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransportStatus::Claimed)
    }
}

impl fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a route has been assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingStatus {
    #[default]
    NotRouted,
    Routed,
}

impl RoutingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingStatus::NotRouted => "NOT_ROUTED",
            RoutingStatus::Routed => "ROUTED",
        }
    }
}

impl fmt::Display for RoutingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

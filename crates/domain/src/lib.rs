//! Domain layer for cargo shipping.
//!
//! This crate provides the core domain abstractions including:
//! - Aggregate trait for event-sourced entities and `reconstruct`
//! - DomainEvent trait for domain events
//! - Command trait and CommandHandler for command processing
//! - Cargo aggregate with its handling state machine
//! - Routing collaborator and the booking service

pub mod aggregate;
pub mod cargo;
pub mod command;
pub mod error;
pub mod routing;

pub use aggregate::{Aggregate, DomainEvent, reconstruct};
pub use cargo::{
    AssignRoute, BookCargo, BookingService, Cargo, CargoError, CargoEvent, ChangeDestination,
    HandlingActivity, Itinerary, Leg, Location, NextExpectedActivity, RegisterHandlingEvent,
    RoutingStatus, TransportStatus, VoyageNumber,
};
pub use command::{Command, CommandHandler, CommandResult};
pub use error::DomainError;
pub use routing::{RegisteredRoutes, RoutingService};

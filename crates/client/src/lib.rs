//! Client surface for cargo shipping.
//!
//! [`LocalClient`] presents the booking service in simple types (string ids
//! and codes, plain detail structs) and [`scenario`] drives a cargo from
//! Hongkong to Stockholm through it.

pub mod client;
pub mod config;
pub mod error;
pub mod scenario;

pub use client::{
    CargoDetails, ExpectedActivity, FirstItinerary, ItineraryDetails, ItinerarySelector,
    LegDetails, LocalClient,
};
pub use config::{Config, ConfigError, LogFormat};
pub use error::{ClientError, Result};

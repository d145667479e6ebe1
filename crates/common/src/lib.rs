//! Shared types for the cargo shipping workspace.

mod types;

pub use types::{AggregateId, ParseAggregateIdError};

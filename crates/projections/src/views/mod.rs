//! Read model views for the query side.

pub mod cargo_tracking;
pub mod handling_history;

pub use cargo_tracking::CargoTrackingView;
pub use handling_history::{HandlingHistoryView, HandlingRecord};

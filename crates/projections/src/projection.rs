//! Core projection trait and position tracking.

use async_trait::async_trait;
use event_store::EventEnvelope;

use crate::Result;

/// How far into the global event log a projection has read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProjectionPosition {
    /// Number of log entries handled, including ones the projection ignored.
    pub events_processed: u64,
}

impl ProjectionPosition {
    /// Position of a projection that has seen nothing.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns the position one entry further on.
    pub fn advance(&self) -> Self {
        Self {
            events_processed: self.events_processed + 1,
        }
    }

    /// True if the log entry at 1-based `index` has not been handled yet.
    pub fn is_before(&self, index: u64) -> bool {
        self.events_processed < index
    }
}

impl std::fmt::Display for ProjectionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "position({})", self.events_processed)
    }
}

/// A projection that folds log entries into a read model.
///
/// Every entry of the global log is handed to every projection exactly once,
/// in append order; projections skip entries they do not care about but
/// still advance their position.
#[async_trait]
pub trait Projection: Send + Sync {
    /// Returns the name of this projection.
    fn name(&self) -> &'static str;

    /// Handles a single log entry.
    async fn handle(&self, event: &EventEnvelope) -> Result<()>;

    /// Returns the current position of this projection.
    async fn position(&self) -> ProjectionPosition;

    /// Drops all projected state and rewinds to the start of the log.
    async fn reset(&self) -> Result<()>;
}

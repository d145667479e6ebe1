//! Cargo tracking read model: the latest state of every booked cargo.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::{Aggregate, Cargo, CargoEvent, TransportStatus};
use event_store::EventEnvelope;
use tokio::sync::RwLock;

use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;
use crate::{ProjectionError, Result};

const NAME: &str = "CargoTrackingView";

#[derive(Default)]
struct State {
    cargos: HashMap<AggregateId, Cargo>,
    position: ProjectionPosition,
}

/// Read model holding one folded `Cargo` per tracking id.
///
/// Each cargo is built with the same `try_apply` the write side replays
/// with, so a tracked cargo always equals the one a command handler would
/// load. An event the cargo refuses is reported and leaves the entry as it
/// was.
#[derive(Clone, Default)]
pub struct CargoTrackingView {
    state: Arc<RwLock<State>>,
}

impl CargoTrackingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the tracked state of a cargo.
    pub async fn get(&self, tracking_id: AggregateId) -> Option<Cargo> {
        self.state.read().await.cargos.get(&tracking_id).cloned()
    }

    /// Gets every tracked cargo.
    pub async fn all(&self) -> Vec<Cargo> {
        self.state.read().await.cargos.values().cloned().collect()
    }

    /// Gets the cargos currently in the given transport status.
    pub async fn by_transport_status(&self, status: TransportStatus) -> Vec<Cargo> {
        self.state
            .read()
            .await
            .cargos
            .values()
            .filter(|c| c.transport_status() == status)
            .cloned()
            .collect()
    }

    /// Gets the cargos flagged as misdirected.
    pub async fn misdirected(&self) -> Vec<Cargo> {
        self.state
            .read()
            .await
            .cargos
            .values()
            .filter(|c| c.is_misdirected())
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Projection for CargoTrackingView {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn handle(&self, event: &EventEnvelope) -> Result<()> {
        let mut state = self.state.write().await;

        if event.aggregate_type == Cargo::aggregate_type() {
            let current = state
                .cargos
                .get(&event.aggregate_id)
                .map(|cargo| cargo.version())
                .unwrap_or_default();

            match event.version.cmp(&current) {
                Ordering::Less => {
                    tracing::debug!(
                        aggregate_id = %event.aggregate_id,
                        version = %event.version,
                        "event already projected"
                    );
                }
                Ordering::Greater => {
                    return Err(ProjectionError::VersionGap {
                        projection: NAME,
                        aggregate_id: event.aggregate_id,
                        expected: current,
                        found: event.version,
                    });
                }
                Ordering::Equal => {
                    let cargo_event: CargoEvent = serde_json::from_value(event.payload.clone())?;
                    let mut cargo = state
                        .cargos
                        .get(&event.aggregate_id)
                        .cloned()
                        .unwrap_or_default();
                    cargo
                        .try_apply(cargo_event)
                        .map_err(|source| ProjectionError::InvalidEvent {
                            projection: NAME,
                            aggregate_id: event.aggregate_id,
                            version: event.version,
                            source,
                        })?;
                    cargo.set_version(event.version.next());
                    state.cargos.insert(event.aggregate_id, cargo);
                }
            }
        }

        state.position = state.position.advance();
        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        self.state.read().await.position
    }

    async fn reset(&self) -> Result<()> {
        *self.state.write().await = State::default();
        Ok(())
    }
}

impl ReadModel for CargoTrackingView {
    fn name(&self) -> &'static str {
        NAME
    }

    fn count(&self) -> usize {
        // Returns 0 while a writer holds the lock
        self.state.try_read().map(|s| s.cargos.len()).unwrap_or(0)
    }
}

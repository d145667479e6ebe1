//! Handling history read model: the ordered handling reports of each cargo.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::AggregateId;
use domain::{CargoEvent, HandlingActivity, Location, VoyageNumber};
use event_store::{EventEnvelope, Version};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;

/// One handling report as it was registered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlingRecord {
    pub activity: HandlingActivity,
    pub location: Location,
    pub voyage_number: Option<VoyageNumber>,
    /// Version of the event in the cargo's stream.
    pub version: Version,
    pub registered_at: DateTime<Utc>,
}

/// Read model of handling reports per cargo, oldest first.
#[derive(Clone)]
pub struct HandlingHistoryView {
    records: Arc<RwLock<HashMap<AggregateId, Vec<HandlingRecord>>>>,
    position: Arc<RwLock<ProjectionPosition>>,
}

impl HandlingHistoryView {
    /// Creates a new empty handling history view.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            position: Arc::new(RwLock::new(ProjectionPosition::zero())),
        }
    }

    /// Gets the handling reports of a cargo, oldest first.
    pub async fn history(&self, tracking_id: AggregateId) -> Vec<HandlingRecord> {
        self.records
            .read()
            .await
            .get(&tracking_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Gets the most recent handling report of a cargo.
    pub async fn last_handling(&self, tracking_id: AggregateId) -> Option<HandlingRecord> {
        self.records
            .read()
            .await
            .get(&tracking_id)
            .and_then(|records| records.last().cloned())
    }
}

impl Default for HandlingHistoryView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Projection for HandlingHistoryView {
    fn name(&self) -> &'static str {
        "HandlingHistoryView"
    }

    async fn handle(&self, event: &EventEnvelope) -> Result<()> {
        if event.aggregate_type == "Cargo" && event.event_type == "HandlingEventRegistered" {
            let cargo_event: CargoEvent = serde_json::from_value(event.payload.clone())?;

            if let CargoEvent::HandlingEventRegistered(data) = cargo_event {
                let mut records = self.records.write().await;
                let history = records.entry(event.aggregate_id).or_default();

                // Replayed entries are already recorded
                if history.last().is_none_or(|last| last.version < event.version) {
                    history.push(HandlingRecord {
                        activity: data.activity,
                        location: data.location,
                        voyage_number: data.voyage_number,
                        version: event.version,
                        registered_at: data.registered_at,
                    });
                }
            }
        }

        let mut pos = self.position.write().await;
        *pos = pos.advance();

        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        *self.position.read().await
    }

    async fn reset(&self) -> Result<()> {
        self.records.write().await.clear();
        *self.position.write().await = ProjectionPosition::zero();
        Ok(())
    }
}

impl ReadModel for HandlingHistoryView {
    fn name(&self) -> &'static str {
        "HandlingHistoryView"
    }

    fn count(&self) -> usize {
        self.records.try_read().map(|r| r.len()).unwrap_or(0)
    }
}

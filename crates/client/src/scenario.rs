//! The Hongkong to Stockholm shipment, including a misdirection and reroute.

use chrono::{Duration, Utc};
use domain::RoutingService;
use event_store::EventStore;

use crate::client::{ItinerarySelector, LocalClient};
use crate::error::Result;

/// One handling report: voyage, location, activity.
type Report = (Option<&'static str>, &'static str, &'static str);

/// Reports up to the wrong port.
const OUTBOUND: [Report; 3] = [
    (None, "HONGKONG", "RECEIVE"),
    (Some("V1"), "HONGKONG", "LOAD"),
    (Some("V1"), "TOKYO", "UNLOAD"),
];

/// Reports after rerouting from Tokyo.
const REROUTED: [Report; 5] = [
    (Some("V3"), "TOKYO", "LOAD"),
    (Some("V3"), "HAMBURG", "UNLOAD"),
    (Some("V4"), "HAMBURG", "LOAD"),
    (Some("V4"), "STOCKHOLM", "UNLOAD"),
    (None, "STOCKHOLM", "CLAIM"),
];

async fn register_all<S: EventStore, R: RoutingService>(
    client: &LocalClient<S, R>,
    tracking_id: &str,
    reports: &[Report],
) -> Result<()> {
    for &(voyage, location, activity) in reports {
        client
            .register_handling_event(tracking_id, voyage, location, activity)
            .await?;
        let details = client.get_cargo_details(tracking_id).await?;
        tracing::info!(
            %tracking_id,
            activity,
            location,
            voyage = voyage.unwrap_or("-"),
            transport_status = %details.transport_status,
            is_misdirected = details.is_misdirected,
            "handling step"
        );
    }
    Ok(())
}

/// Books a cargo from Hongkong to Stockholm, routes it, misdirects it to
/// Tokyo, reroutes it and claims it in Stockholm.
///
/// Returns the tracking id.
#[tracing::instrument(skip_all)]
pub async fn hongkong_to_stockholm<S: EventStore, R: RoutingService>(
    client: &LocalClient<S, R>,
    selector: &impl ItinerarySelector,
) -> Result<String> {
    let tracking_id = client
        .book_new_cargo("HONGKONG", "STOCKHOLM", Utc::now() + Duration::weeks(2))
        .await?;
    tracing::info!(%tracking_id, "booked");

    let route = client.route_cargo(&tracking_id, selector).await?;
    tracing::info!(%tracking_id, legs = route.legs.len(), "routed");

    register_all(client, &tracking_id, &OUTBOUND).await?;

    let route = client.route_cargo(&tracking_id, selector).await?;
    tracing::info!(%tracking_id, from = %route.origin, "rerouted");

    register_all(client, &tracking_id, &REROUTED).await?;
    Ok(tracking_id)
}

//! End-to-end tests through the client interface.

use chrono::{Duration, Utc};
use client::{ClientError, ExpectedActivity, FirstItinerary, ItinerarySelector, LocalClient, scenario};
use domain::{BookingService, CargoError, DomainError, RegisteredRoutes};
use event_store::InMemoryEventStore;

type Client = LocalClient<InMemoryEventStore, RegisteredRoutes>;

fn create_client() -> Client {
    LocalClient::new(BookingService::new(
        InMemoryEventStore::new(),
        RegisteredRoutes::standard(),
    ))
}

async fn select_and_assign(client: &Client, tracking_id: &str) {
    let offered = client
        .request_possible_routes_for_cargo(tracking_id)
        .await
        .unwrap();
    let chosen = FirstItinerary.select(&offered).unwrap();
    client.assign_route(tracking_id, chosen).await.unwrap();
}

#[tokio::test]
async fn admin_can_book_new_cargo() {
    let client = create_client();
    let arrival_deadline = Utc::now() + Duration::weeks(3);

    let cargo_id = client
        .book_new_cargo("NLRTM", "USDAL", arrival_deadline)
        .await
        .unwrap();

    let details = client.get_cargo_details(&cargo_id).await.unwrap();
    assert!(!details.id.is_empty());
    assert_eq!(details.origin, "NLRTM");
    assert_eq!(details.destination, "USDAL");

    client.change_destination(&cargo_id, "AUMEL").await.unwrap();
    let details = client.get_cargo_details(&cargo_id).await.unwrap();
    assert_eq!(details.destination, "AUMEL");
    assert_eq!(details.arrival_deadline, arrival_deadline);
}

#[tokio::test]
async fn cargo_from_hongkong_to_stockholm() {
    let client = create_client();

    // Booking
    let tracking_id = client
        .book_new_cargo("HONGKONG", "STOCKHOLM", Utc::now() + Duration::weeks(2))
        .await
        .unwrap();

    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.transport_status, "NOT_RECEIVED");
    assert_eq!(details.routing_status, "NOT_ROUTED");
    assert!(!details.is_misdirected);
    assert_eq!(details.estimated_time_of_arrival, None);
    assert_eq!(details.next_expected_activity, None);

    // Routing
    select_and_assign(&client, &tracking_id).await;

    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.transport_status, "NOT_RECEIVED");
    assert_eq!(details.routing_status, "ROUTED");
    assert!(!details.is_misdirected);
    assert!(details.estimated_time_of_arrival.is_some());
    assert_eq!(
        details.next_expected_activity,
        Some(ExpectedActivity::pair("RECEIVE", "HONGKONG"))
    );

    // Received in Hongkong
    client
        .register_handling_event(&tracking_id, None, "HONGKONG", "RECEIVE")
        .await
        .unwrap();
    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.transport_status, "IN_PORT");
    assert_eq!(details.last_known_location.as_deref(), Some("HONGKONG"));
    assert_eq!(
        details.next_expected_activity,
        Some(ExpectedActivity::triple("LOAD", "HONGKONG", "V1"))
    );

    // Loaded onto V1
    client
        .register_handling_event(&tracking_id, Some("V1"), "HONGKONG", "LOAD")
        .await
        .unwrap();
    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.current_voyage_number.as_deref(), Some("V1"));
    assert_eq!(details.last_known_location.as_deref(), Some("HONGKONG"));
    assert_eq!(details.transport_status, "ONBOARD_CARRIER");
    assert_eq!(
        details.next_expected_activity,
        Some(ExpectedActivity::triple("UNLOAD", "NEWYORK", "V1"))
    );

    // Unloaded in Tokyo by mistake
    client
        .register_handling_event(&tracking_id, Some("V1"), "TOKYO", "UNLOAD")
        .await
        .unwrap();
    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.current_voyage_number, None);
    assert_eq!(details.last_known_location.as_deref(), Some("TOKYO"));
    assert_eq!(details.transport_status, "IN_PORT");
    assert!(details.is_misdirected);
    assert_eq!(details.next_expected_activity, None);

    // Rerouted from Tokyo
    select_and_assign(&client, &tracking_id).await;
    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.route.as_ref().unwrap().origin, "TOKYO");
    assert!(!details.is_misdirected);

    // Loaded onto V3 in Tokyo
    client
        .register_handling_event(&tracking_id, Some("V3"), "TOKYO", "LOAD")
        .await
        .unwrap();
    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.current_voyage_number.as_deref(), Some("V3"));
    assert_eq!(details.last_known_location.as_deref(), Some("TOKYO"));
    assert_eq!(details.transport_status, "ONBOARD_CARRIER");
    assert!(!details.is_misdirected);
    assert_eq!(
        details.next_expected_activity,
        Some(ExpectedActivity::triple("UNLOAD", "HAMBURG", "V3"))
    );

    // Unloaded in Hamburg
    client
        .register_handling_event(&tracking_id, Some("V3"), "HAMBURG", "UNLOAD")
        .await
        .unwrap();
    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.current_voyage_number, None);
    assert_eq!(details.last_known_location.as_deref(), Some("HAMBURG"));
    assert_eq!(details.transport_status, "IN_PORT");
    assert!(!details.is_misdirected);
    assert_eq!(
        details.next_expected_activity,
        Some(ExpectedActivity::triple("LOAD", "HAMBURG", "V4"))
    );

    // Loaded onto V4 in Hamburg
    client
        .register_handling_event(&tracking_id, Some("V4"), "HAMBURG", "LOAD")
        .await
        .unwrap();
    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.current_voyage_number.as_deref(), Some("V4"));
    assert_eq!(details.last_known_location.as_deref(), Some("HAMBURG"));
    assert_eq!(details.transport_status, "ONBOARD_CARRIER");
    assert!(!details.is_misdirected);
    assert_eq!(
        details.next_expected_activity,
        Some(ExpectedActivity::triple("UNLOAD", "STOCKHOLM", "V4"))
    );

    // Unloaded in Stockholm
    client
        .register_handling_event(&tracking_id, Some("V4"), "STOCKHOLM", "UNLOAD")
        .await
        .unwrap();
    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.current_voyage_number, None);
    assert_eq!(details.last_known_location.as_deref(), Some("STOCKHOLM"));
    assert_eq!(details.transport_status, "IN_PORT");
    assert!(!details.is_misdirected);
    assert_eq!(
        details.next_expected_activity,
        Some(ExpectedActivity::pair("CLAIM", "STOCKHOLM"))
    );

    // Claimed in Stockholm
    client
        .register_handling_event(&tracking_id, None, "STOCKHOLM", "CLAIM")
        .await
        .unwrap();
    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.current_voyage_number, None);
    assert_eq!(details.last_known_location.as_deref(), Some("STOCKHOLM"));
    assert_eq!(details.transport_status, "CLAIMED");
    assert!(!details.is_misdirected);
    assert_eq!(details.next_expected_activity, None);
}

#[tokio::test]
async fn scenario_runner_ends_claimed() {
    let client = create_client();

    let tracking_id = scenario::hongkong_to_stockholm(&client, &FirstItinerary)
        .await
        .unwrap();

    let details = client.get_cargo_details(&tracking_id).await.unwrap();
    assert_eq!(details.transport_status, "CLAIMED");
    assert_eq!(details.last_known_location.as_deref(), Some("STOCKHOLM"));
    assert!(!details.is_misdirected);
}

#[tokio::test]
async fn handling_after_claim_is_rejected() {
    let client = create_client();
    let tracking_id = scenario::hongkong_to_stockholm(&client, &FirstItinerary)
        .await
        .unwrap();

    let result = client
        .register_handling_event(&tracking_id, Some("V4"), "STOCKHOLM", "LOAD")
        .await;

    assert!(matches!(
        result,
        Err(ClientError::Domain(DomainError::Cargo(
            CargoError::AlreadyClaimed { .. }
        )))
    ));
}

#[tokio::test]
async fn unregistered_pair_has_no_routes() {
    let client = create_client();
    let tracking_id = client
        .book_new_cargo("NLRTM", "USDAL", Utc::now())
        .await
        .unwrap();

    let result = client.request_possible_routes_for_cargo(&tracking_id).await;

    assert!(matches!(
        result,
        Err(ClientError::Domain(DomainError::NoRouteFound { .. }))
    ));
}

//! Booking service: the application-level entry point for cargo operations.

use common::AggregateId;
use event_store::EventStore;

use crate::command::{Command, CommandHandler, CommandResult};
use crate::error::DomainError;
use crate::routing::RoutingService;

use super::{AssignRoute, BookCargo, Cargo, ChangeDestination, Itinerary, RegisterHandlingEvent};

fn record_command(command: &'static str) {
    metrics::counter!("cargo_commands_total", "command" => command).increment(1);
}

/// Service for booking and tracking cargo.
///
/// Wraps the command handler for `Cargo` and the routing collaborator used to
/// propose itineraries.
pub struct BookingService<S: EventStore, R: RoutingService> {
    handler: CommandHandler<S, Cargo>,
    routing: R,
}

impl<S: EventStore, R: RoutingService> BookingService<S, R> {
    /// Creates a new booking service.
    pub fn new(store: S, routing: R) -> Self {
        Self {
            handler: CommandHandler::new(store),
            routing,
        }
    }

    /// Returns a reference to the underlying command handler.
    pub fn handler(&self) -> &CommandHandler<S, Cargo> {
        &self.handler
    }

    /// Returns the routing collaborator.
    pub fn routing(&self) -> &R {
        &self.routing
    }

    /// Books a new cargo.
    #[tracing::instrument(skip(self))]
    pub async fn book_new_cargo(&self, cmd: BookCargo) -> Result<CommandResult<Cargo>, DomainError> {
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |cargo| {
                cargo.book(
                    cmd.tracking_id,
                    cmd.origin,
                    cmd.destination,
                    cmd.arrival_deadline,
                )
            })
            .await?;

        record_command("book_new_cargo");
        tracing::info!(
            tracking_id = %cmd.tracking_id,
            origin = %cmd.origin,
            destination = %cmd.destination,
            "cargo booked"
        );
        Ok(result)
    }

    /// Changes the destination of a booked cargo.
    #[tracing::instrument(skip(self))]
    pub async fn change_destination(
        &self,
        cmd: ChangeDestination,
    ) -> Result<CommandResult<Cargo>, DomainError> {
        let result = self
            .handler
            .execute_existing(cmd.aggregate_id(), |cargo| {
                cargo.change_destination(cmd.destination)
            })
            .await?;

        record_command("change_destination");
        Ok(result)
    }

    /// Asks the routing collaborator for itineraries from where the cargo
    /// currently is to its destination.
    #[tracing::instrument(skip(self))]
    pub async fn request_possible_routes(
        &self,
        tracking_id: AggregateId,
    ) -> Result<Vec<Itinerary>, DomainError> {
        let cargo = self.handler.get(tracking_id).await?;
        // `get` only returns booked cargos, so this cannot fail here
        let (from, to) = cargo.route_request()?;

        let routes = self.routing.find_routes(from, to).await?;
        tracing::debug!(%tracking_id, %from, %to, count = routes.len(), "routes found");
        Ok(routes)
    }

    /// Assigns an itinerary to a cargo.
    #[tracing::instrument(skip(self))]
    pub async fn assign_route(&self, cmd: AssignRoute) -> Result<CommandResult<Cargo>, DomainError> {
        let itinerary = cmd.itinerary.clone();

        let result = self
            .handler
            .execute_existing(cmd.aggregate_id(), |cargo| cargo.assign_route(itinerary))
            .await?;

        record_command("assign_route");
        Ok(result)
    }

    /// Records a handling report for a cargo.
    #[tracing::instrument(skip(self))]
    pub async fn register_handling_event(
        &self,
        cmd: RegisterHandlingEvent,
    ) -> Result<CommandResult<Cargo>, DomainError> {
        let voyage_number = cmd.voyage_number.clone();
        let mut was_misdirected = false;

        let result = self
            .handler
            .execute_existing(cmd.aggregate_id(), |cargo| {
                was_misdirected = cargo.is_misdirected();
                cargo.register_handling_event(voyage_number, cmd.location, cmd.activity)
            })
            .await?;

        record_command("register_handling_event");
        if result.aggregate.is_misdirected() && !was_misdirected {
            metrics::counter!("cargo_misdirected_total").increment(1);
        }
        tracing::info!(
            tracking_id = %cmd.tracking_id,
            activity = %cmd.activity,
            location = %cmd.location,
            voyage = ?cmd.voyage_number,
            transport_status = %result.aggregate.transport_status(),
            "handling registered"
        );
        Ok(result)
    }

    /// Loads a cargo by tracking id.
    #[tracing::instrument(skip(self))]
    pub async fn get_cargo(&self, tracking_id: AggregateId) -> Result<Cargo, DomainError> {
        self.handler.get(tracking_id).await
    }
}

//! Scenario runner entry point.

use std::process::ExitCode;

use client::{Config, FirstItinerary, LocalClient, LogFormat, scenario};
use common::AggregateId;
use domain::{BookingService, RegisteredRoutes};
use event_store::InMemoryEventStore;
use metrics_exporter_prometheus::PrometheusHandle;
use projections::{CargoTrackingView, HandlingHistoryView, ProjectionProcessor};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn run(config: &Config, metrics_handle: &PrometheusHandle) -> client::Result<()> {
    // 1. Route table
    let routes = match &config.routes_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading route table");
            RegisteredRoutes::from_file(path)?
        }
        None => RegisteredRoutes::standard(),
    };

    // 2. Store, service, client and read models
    let store = InMemoryEventStore::new();
    let client = LocalClient::new(BookingService::new(store.clone(), routes));

    let tracking = CargoTrackingView::new();
    let history = HandlingHistoryView::new();
    let processor = ProjectionProcessor::new(store)
        .with_projection(Box::new(tracking.clone()))
        .with_projection(Box::new(history.clone()));

    // 3. Drive the cargo through its journey
    let tracking_id = scenario::hongkong_to_stockholm(&client, &FirstItinerary).await?;

    // 4. Bring the read models up to date and report
    processor.run_catch_up().await?;

    let id: AggregateId = tracking_id.parse()?;
    let report = serde_json::json!({
        "cargo": client.get_cargo_details(&tracking_id).await?,
        "handling_history": history.history(id).await,
        "misdirected_cargos": tracking.misdirected().await.len(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if config.print_metrics {
        println!("{}", metrics_handle.render());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    match run(&config, &metrics_handle).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "scenario failed");
            ExitCode::FAILURE
        }
    }
}

//! Headless driver for the geocamera readout core.
//!
//! Stands in for the camera overlay: it starts simulated sensor feeds, keeps
//! the sensor store and elevation cache alive, and prints the derived readout
//! on every tick.

mod launch_params;
mod simulator;

use std::sync::Arc;

use geocamera::permissions::{PermissionGate, SetupAction};
use geocamera::{ElevationCache, Readout, SensorStore, TaskSpawner, sensors};
use tokio::runtime::Handle;

use crate::simulator::Feeds;

#[tokio::main]
async fn main() {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let params = launch_params::parse();

    let cache = match ElevationCache::open_topo_data(
        &params.elevation,
        TaskSpawner::from_handle(Handle::current()),
    ) {
        Ok(cache) => cache,
        Err(e) => {
            tracing::error!("Failed to create elevation client: {e}");
            return;
        }
    };

    let mut location_gate = PermissionGate::new();
    let location = match location_gate.check(params.location_permission) {
        SetupAction::Setup => true,
        SetupAction::RequestAccess => {
            // Headless: the simulated user always grants access.
            location_gate.access_response(true) == SetupAction::Setup
        }
        SetupAction::Skip => false,
    };
    if location_gate.alert() {
        println!("Location access denied: coordinates and distance will read as zero");
    }

    let store = Arc::new(SensorStore::new());
    let (tx, rx) = sensors::feed();
    tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.pump(rx).await }
    });
    simulator::spawn(
        &params,
        Feeds {
            location,
            motion: true,
        },
        &tx,
    );

    tracing::info!(
        lat = params.lat,
        lon = params.lon,
        orientation = ?params.orientation,
        "Started simulated feeds"
    );

    let mut interval = tokio::time::interval(params.tick_interval);
    for _ in 0..params.ticks {
        interval.tick().await;

        let readout = Readout::compute(&store.snapshot(), &cache).format();
        println!("{readout}");
    }

    tracing::info!(
        cached = cache.len(),
        pending = cache.pending_count(),
        "Done"
    );
}

//! # hearthd — hearth daemon
//!
//! Composition root that wires the state store, services and RPC listener
//! together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (`hearth.toml` + environment variables)
//! - Initialise `tracing` logging
//! - Construct the one shared state store for the process
//! - Construct application services, injecting the store via the port trait
//! - Build the axum router hosting all three RPC services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hearth_adapter_rpc_axum::state::RpcState;
use hearth_app::services::device_service::DeviceService;
use hearth_app::services::security_service::SecurityService;
use hearth_app::services::thermostat_service::ThermostatService;
use hearth_app::state_store::InMemoryStateStore;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // State
    let store = Arc::new(InMemoryStateStore::new());

    // Services
    let thermostat = ThermostatService::new(Arc::clone(&store), config.stream_settings());
    let security = SecurityService::new(Arc::clone(&store));
    let device = DeviceService::new(store);

    // RPC
    let state = RpcState::new(thermostat, security, device)
        .with_channel_capacity(config.streaming.channel_capacity);
    let app = hearth_adapter_rpc_axum::router::build(state, config.web.static_dir.as_deref());

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "hearthd listening");
    if let Some(dir) = &config.web.static_dir {
        tracing::info!(dir = %dir.display(), "serving static web page");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("hearthd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

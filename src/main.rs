//! vmwatch - VM lifecycle monitor
//!
//! Wires the tracking core to the simulated hypervisor provider and runs a
//! short demo: dispatch a start command, watch the machine pass through its
//! transient states, and exit once every transition has settled.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vmwatch::core::{ActionKind, CommandDispatcher, PollScheduler, Settings, TransitionTracker};
use vmwatch::notify::LogNotifier;
use vmwatch::provider::sim::SimHypervisor;
use vmwatch::provider::MenuGate;

/// Application name constant
pub const APP_NAME: &str = "vmwatch";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load settings, using defaults: {e:#}");
        Settings::default()
    });
    init_logging(&settings);

    info!("{} v{} starting...", APP_NAME, APP_VERSION);
    if let Some(root) = &settings.hypervisor_root {
        info!("Hypervisor root: {}", root);
    }

    let inventory = Arc::new(SimHypervisor::with_demo_fleet());
    let sink = Arc::new(LogNotifier::new(settings.notifications_enabled));
    let tracker = Arc::new(TransitionTracker::new(sink));
    let dispatcher = CommandDispatcher::new(inventory.clone(), Arc::clone(&tracker));
    let menu = Arc::new(MenuGate::new());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = PollScheduler::new(
        Arc::clone(&tracker),
        inventory.clone(),
        menu,
        settings.poll_interval(),
        shutdown_rx,
    );
    let poller = tokio::spawn(scheduler.run());
    info!("Poll scheduler running");

    if let Err(e) = dispatcher.dispatch(ActionKind::Start, "dev-box") {
        error!("Dispatch failed: {}", e);
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Interrupt received"),
        _ = wait_idle(&tracker) => info!("All transitions settled"),
    }

    let _ = shutdown_tx.send(true);
    let _ = poller.await;

    if let Some(state) = inventory.machine_state("dev-box") {
        info!("dev-box finished in state {}", state);
    }
    info!("{} shutting down", APP_NAME);
    Ok(())
}

/// Resolves once the tracker has drained and polling is disarmed.
async fn wait_idle(tracker: &TransitionTracker) {
    loop {
        tokio::time::sleep(Duration::from_millis(250)).await;
        if !tracker.is_polling_active() {
            return;
        }
    }
}

/// Initialize the logging system
fn init_logging(settings: &Settings) {
    let default_filter = if settings.debug_logging {
        "vmwatch=debug"
    } else {
        "vmwatch=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

//! External collaborator seams: the hypervisor inventory, the notification
//! sink and the menu-visibility query.
//!
//! The core never talks to a hypervisor directly; it only depends on these
//! traits. `sim` provides the in-memory implementation used by the demo
//! binary and the integration tests.

pub mod sim;

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::core::{MachineSnapshot, MachineState};

/// Failures at the hypervisor boundary. The core treats any of these as
/// "this tick/command failed" and never retries on its own.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("machine not found: {0}")]
    MachineNotFound(String),

    #[error("hypervisor host unavailable: {0}")]
    HostUnavailable(String),

    #[error("state change rejected for '{machine}' (host code {code})")]
    RequestRejected { machine: String, code: u32 },
}

/// Query/command interface to the hypervisor host.
pub trait MachineInventory: Send + Sync {
    /// Snapshot every machine on the host. A failed fetch abandons the
    /// current poll tick; the next tick retries naturally.
    fn list_machines(&self) -> Result<Vec<MachineSnapshot>, InventoryError>;

    /// Ask the host to move a machine toward `target`. Success means the
    /// request was accepted, not that the transition completed.
    fn request_transition(
        &self,
        machine_id: &str,
        target: MachineState,
    ) -> Result<(), InventoryError>;
}

/// Fire-and-forget notification delivery. No acknowledgment, no ordering
/// guarantee beyond call order.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Asked once per scheduler tick; a tick is skipped entirely while the
/// operator has the menu open, to avoid rebuild flicker under their cursor.
pub trait MenuVisibility: Send + Sync {
    fn is_menu_open(&self) -> bool;
}

/// Shared open/closed flag the presentation layer flips and the scheduler
/// reads. Defaults to closed.
#[derive(Debug, Default)]
pub struct MenuGate {
    open: AtomicBool,
}

impl MenuGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::Relaxed);
    }
}

impl MenuVisibility for MenuGate {
    fn is_menu_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }
}

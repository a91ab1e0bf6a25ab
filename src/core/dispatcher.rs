//! Command dispatch - from an operator action to an awaited transition

use std::sync::Arc;

use tracing::info;

use super::action::ActionKind;
use super::tracker::TransitionTracker;
use crate::provider::{InventoryError, MachineInventory};

/// Translates an operator-selected action into a host state-change request
/// and registers the machine with the tracker as awaiting settlement.
pub struct CommandDispatcher {
    inventory: Arc<dyn MachineInventory>,
    tracker: Arc<TransitionTracker>,
}

impl CommandDispatcher {
    pub fn new(inventory: Arc<dyn MachineInventory>, tracker: Arc<TransitionTracker>) -> Self {
        Self { inventory, tracker }
    }

    /// Issue `action` against a machine. Tracking begins only once the host
    /// accepts the request: a command that failed to even enqueue must never
    /// produce notifications, so a rejection propagates with the tracker
    /// untouched.
    pub fn dispatch(&self, action: ActionKind, machine_id: &str) -> Result<(), InventoryError> {
        let target = action.target_state();
        info!(
            "Dispatching '{}' for '{}' (target {})",
            action, machine_id, target
        );
        self.inventory.request_transition(machine_id, target)?;
        self.tracker.begin_awaiting(machine_id);
        Ok(())
    }
}

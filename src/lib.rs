//! vmwatch - Monitor virtual machine lifecycle transitions on a hypervisor host
//!
//! The core is a change-detection engine: a periodic poller snapshots machine
//! state, diffs it against the last state notified for each watched machine,
//! and emits exactly one notification per observed transition while noisy
//! intermediate states (starting, saving, stopping) are in flight.
//!
//! The hypervisor itself and the menu/tray presentation are collaborators
//! behind the traits in [`provider`]; this crate owns the tracking, polling
//! and dispatch logic between them.

pub mod core;
pub mod notify;
pub mod provider;

pub use crate::core::{
    allowed_actions, ActionKind, CommandDispatcher, MachineSnapshot, MachineState, PollScheduler,
    Settings, TransitionTracker,
};
pub use crate::provider::{InventoryError, MachineInventory, MenuVisibility, NotificationSink};

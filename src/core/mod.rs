//! Core module - state classification, transition tracking, polling and dispatch

mod action;
mod dispatcher;
mod machine;
mod scheduler;
pub mod settings;
mod state;
mod tracker;

pub use action::{allowed_actions, ActionKind};
pub use dispatcher::CommandDispatcher;
pub use machine::MachineSnapshot;
pub use scheduler::{PollScheduler, DEFAULT_POLL_INTERVAL};
pub use settings::Settings;
pub use state::MachineState;
pub use tracker::TransitionTracker;

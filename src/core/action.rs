//! Operator actions and the menu-state policy

use serde::{Deserialize, Serialize};

use super::state::MachineState;

/// A lifecycle command the operator can issue against a machine.
///
/// The enum is closed: an unrecognized action is unrepresentable, so the
/// dispatcher never needs a runtime "unexpected action" path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Start,
    Stop,
    ShutDown,
    Pause,
    SaveState,
}

impl ActionKind {
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::Start,
            ActionKind::Stop,
            ActionKind::ShutDown,
            ActionKind::Pause,
            ActionKind::SaveState,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::ShutDown => "Shut Down",
            Self::Pause => "Pause",
            Self::SaveState => "Save State",
        }
    }

    /// The state requested from the host when this action is dispatched.
    pub fn target_state(self) -> MachineState {
        match self {
            Self::Start => MachineState::Running,
            Self::Stop => MachineState::Stopped,
            Self::ShutDown => MachineState::ShuttingDown,
            Self::Pause => MachineState::Paused,
            Self::SaveState => MachineState::Saved,
        }
    }

    /// Menu-state policy: whether this action is offered for a machine
    /// currently in `state`. Pure function, independent of any UI.
    ///
    /// Transient states and `Unknown` offer nothing: a machine mid-transition
    /// takes no further commands until it settles.
    pub fn is_allowed_in(self, state: MachineState) -> bool {
        match state {
            MachineState::Running => self != Self::Start,
            MachineState::Stopped | MachineState::Saved | MachineState::ShuttingDown => {
                matches!(self, Self::Start | Self::ShutDown)
            }
            MachineState::Paused => self != Self::Pause,
            _ => false,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The subset of actions valid for a machine in `state`, in menu order.
pub fn allowed_actions(state: MachineState) -> Vec<ActionKind> {
    ActionKind::all()
        .iter()
        .copied()
        .filter(|action| action.is_allowed_in(state))
        .collect()
}

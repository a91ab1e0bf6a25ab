//! Machine lifecycle states and the raw-code classifier

use serde::{Deserialize, Serialize};

/// Lifecycle state of a virtual machine.
///
/// Raw codes follow the hypervisor's `EnabledState` values; anything the host
/// reports outside the known set classifies to [`MachineState::Unknown`]
/// rather than failing, so new firmware states never crash the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineState {
    /// State could not be determined, or a command was just issued and no
    /// fresh observation exists yet
    Unknown,
    /// Machine is powered on and enabled
    Running,
    /// Machine is powered off
    Stopped,
    /// Guest-initiated shutdown in progress
    ShuttingDown,
    /// Machine state was saved to disk (enabled but offline)
    Saved,
    /// Machine is quiesced
    Paused,
    /// Power-on in progress
    Starting,
    /// Save-to-disk in progress
    Saving,
    /// Power-off in progress
    Stopping,
    /// Quiesce in progress
    Pausing,
    /// Resume from pause in progress
    Resuming,
}

impl MachineState {
    /// Map a raw host state code to a semantic state. Total: unrecognized
    /// codes (including 0 "Unknown" and 1 "Other") become `Unknown`.
    pub fn classify(raw: u16) -> Self {
        match raw {
            2 => Self::Running,
            3 => Self::Stopped,
            4 => Self::ShuttingDown,
            6 => Self::Saved,
            9 => Self::Paused,
            32770 => Self::Starting,
            32773 => Self::Saving,
            32774 => Self::Stopping,
            32776 => Self::Pausing,
            32777 => Self::Resuming,
            _ => Self::Unknown,
        }
    }

    /// The wire code sent to the host when requesting this state.
    pub fn raw_code(self) -> u16 {
        match self {
            Self::Unknown => 0,
            Self::Running => 2,
            Self::Stopped => 3,
            Self::ShuttingDown => 4,
            Self::Saved => 6,
            Self::Paused => 9,
            Self::Starting => 32770,
            Self::Saving => 32773,
            Self::Stopping => 32774,
            Self::Pausing => 32776,
            Self::Resuming => 32777,
        }
    }

    /// A settled state is one the machine stays in absent further commands.
    /// Everything else is transient while a transition is in flight.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            Self::Running | Self::Stopped | Self::Saved | Self::Paused
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Running => "Running",
            Self::Stopped => "Stopped",
            Self::ShuttingDown => "Shutting Down",
            Self::Saved => "Saved",
            Self::Paused => "Paused",
            Self::Starting => "Starting",
            Self::Saving => "Saving",
            Self::Stopping => "Stopping",
            Self::Pausing => "Pausing",
            Self::Resuming => "Resuming",
        }
    }
}

impl std::fmt::Display for MachineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

//! Machine snapshots - one immutable observation per machine per poll

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::MachineState;

/// A point-in-time observation of a single machine, produced fresh on every
/// inventory fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Stable identifier: the machine's display name on the host
    pub id: String,
    /// Raw state code as reported by the host
    pub raw_state: u16,
    /// Semantic state derived from `raw_state`
    pub state: MachineState,
    /// When this observation was taken
    pub observed_at: DateTime<Utc>,
}

impl MachineSnapshot {
    pub fn new(id: impl Into<String>, raw_state: u16) -> Self {
        Self {
            id: id.into(),
            raw_state,
            state: MachineState::classify(raw_state),
            observed_at: Utc::now(),
        }
    }

    /// Display text for menus: name plus state, state suffix omitted for
    /// stopped machines since that is the uninteresting default.
    pub fn status_label(&self) -> String {
        if self.state == MachineState::Stopped {
            self.id.clone()
        } else {
            format!("{} [{}]", self.id, self.state.label())
        }
    }
}

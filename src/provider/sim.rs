//! In-memory hypervisor used by the demo binary and the integration tests.
//!
//! Machines move through realistic transient sequences one step per poll, so
//! a monitor watching this provider sees the same noisy intermediate states
//! a real host produces (Stopped -> Starting -> Running and so on).

use std::collections::VecDeque;
use std::sync::Mutex;

use tracing::debug;

use super::{InventoryError, MachineInventory};
use crate::core::{MachineSnapshot, MachineState};

/// Host return code for a transition request that is invalid in the
/// machine's current state.
const REJECT_INVALID_STATE: u32 = 32775;

struct SimMachine {
    name: String,
    state: MachineState,
    /// Remaining states of an in-flight transition, front first.
    plan: VecDeque<MachineState>,
}

/// Simulated single-host hypervisor.
pub struct SimHypervisor {
    machines: Mutex<Vec<SimMachine>>,
}

impl SimHypervisor {
    pub fn new() -> Self {
        Self {
            machines: Mutex::new(Vec::new()),
        }
    }

    /// A small fleet for the demo binary.
    pub fn with_demo_fleet() -> Self {
        let sim = Self::new();
        sim.add_machine("dev-box", MachineState::Stopped);
        sim.add_machine("build-agent", MachineState::Running);
        sim.add_machine("archive", MachineState::Saved);
        sim
    }

    pub fn add_machine(&self, name: &str, state: MachineState) {
        self.machines.lock().expect("Sim lock poisoned").push(SimMachine {
            name: name.to_string(),
            state,
            plan: VecDeque::new(),
        });
    }

    /// Current state of a machine, for assertions and demo output.
    pub fn machine_state(&self, name: &str) -> Option<MachineState> {
        self.machines
            .lock()
            .expect("Sim lock poisoned")
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.state)
    }

    /// The intermediate and final states a machine passes through on its way
    /// to `target`.
    fn plan_for(current: MachineState, target: MachineState) -> VecDeque<MachineState> {
        let steps: &[MachineState] = match target {
            MachineState::Running if current == MachineState::Paused => {
                &[MachineState::Resuming, MachineState::Running]
            }
            MachineState::Running => &[MachineState::Starting, MachineState::Running],
            MachineState::Stopped => &[MachineState::Stopping, MachineState::Stopped],
            // Guest shutdown passes through ShuttingDown and ends powered off.
            MachineState::ShuttingDown => &[MachineState::ShuttingDown, MachineState::Stopped],
            MachineState::Paused => &[MachineState::Pausing, MachineState::Paused],
            MachineState::Saved => &[MachineState::Saving, MachineState::Saved],
            _ => &[],
        };
        steps.iter().copied().collect()
    }
}

impl Default for SimHypervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineInventory for SimHypervisor {
    /// Snapshot the fleet. Each fetch advances every in-flight machine one
    /// step through its plan, like time passing on a real host between polls.
    fn list_machines(&self) -> Result<Vec<MachineSnapshot>, InventoryError> {
        let mut machines = self.machines.lock().expect("Sim lock poisoned");
        Ok(machines
            .iter_mut()
            .map(|machine| {
                if let Some(next) = machine.plan.pop_front() {
                    debug!("Sim: '{}' {} -> {}", machine.name, machine.state, next);
                    machine.state = next;
                }
                MachineSnapshot::new(machine.name.clone(), machine.state.raw_code())
            })
            .collect())
    }

    fn request_transition(
        &self,
        machine_id: &str,
        target: MachineState,
    ) -> Result<(), InventoryError> {
        let mut machines = self.machines.lock().expect("Sim lock poisoned");
        let machine = machines
            .iter_mut()
            .find(|m| m.name == machine_id)
            .ok_or_else(|| InventoryError::MachineNotFound(machine_id.to_string()))?;

        if machine.state == target {
            return Err(InventoryError::RequestRejected {
                machine: machine_id.to_string(),
                code: REJECT_INVALID_STATE,
            });
        }

        machine.plan = Self::plan_for(machine.state, target);
        debug!(
            "Sim: accepted transition of '{}' toward {}",
            machine_id, target
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_passes_through_starting() {
        let sim = SimHypervisor::new();
        sim.add_machine("VM1", MachineState::Stopped);
        sim.request_transition("VM1", MachineState::Running).unwrap();

        let states: Vec<MachineState> = (0..3)
            .map(|_| sim.list_machines().unwrap()[0].state)
            .collect();
        assert_eq!(
            states,
            vec![
                MachineState::Starting,
                MachineState::Running,
                MachineState::Running
            ]
        );
    }

    #[test]
    fn resume_from_paused_passes_through_resuming() {
        let sim = SimHypervisor::new();
        sim.add_machine("VM1", MachineState::Paused);
        sim.request_transition("VM1", MachineState::Running).unwrap();
        assert_eq!(sim.list_machines().unwrap()[0].state, MachineState::Resuming);
    }

    #[test]
    fn shutdown_ends_stopped() {
        let sim = SimHypervisor::new();
        sim.add_machine("VM1", MachineState::Running);
        sim.request_transition("VM1", MachineState::ShuttingDown)
            .unwrap();
        let states: Vec<MachineState> = (0..2)
            .map(|_| sim.list_machines().unwrap()[0].state)
            .collect();
        assert_eq!(
            states,
            vec![MachineState::ShuttingDown, MachineState::Stopped]
        );
    }

    #[test]
    fn unknown_machine_is_rejected() {
        let sim = SimHypervisor::new();
        let err = sim
            .request_transition("ghost", MachineState::Running)
            .unwrap_err();
        assert!(matches!(err, InventoryError::MachineNotFound(_)));
    }

    #[test]
    fn redundant_target_is_rejected() {
        let sim = SimHypervisor::new();
        sim.add_machine("VM1", MachineState::Running);
        let err = sim
            .request_transition("VM1", MachineState::Running)
            .unwrap_err();
        assert!(matches!(err, InventoryError::RequestRejected { .. }));
    }
}

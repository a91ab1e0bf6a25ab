//! Transition tracking - the change-detection core
//!
//! Holds the set of machines under observation and the last state notified
//! for each. `observe` diffs fresh snapshots against that baseline and emits
//! exactly one notification per state delta; a machine leaves the set on the
//! same pass that sees it reach a settled state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;
use tracing::{debug, info};

use super::machine::MachineSnapshot;
use super::state::MachineState;
use crate::provider::NotificationSink;

/// Notification title used for every state-change balloon.
const NOTIFY_TITLE: &str = "VM State Changed";

struct WatchState {
    /// Machine id -> last state notified for it. `Unknown` means a command
    /// was just dispatched and we are awaiting any determinable state.
    entries: HashMap<String, MachineState>,
    /// Armed by `begin_awaiting`, disarmed when the watched set drains.
    polling_active: bool,
}

/// Stateful core of the monitor. All mutation goes through one mutex, since
/// `begin_awaiting` (user thread) and `observe` (poll task) race on the map.
pub struct TransitionTracker {
    watched: Mutex<WatchState>,
    rearm: Notify,
    sink: Arc<dyn NotificationSink>,
}

impl TransitionTracker {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            watched: Mutex::new(WatchState {
                entries: HashMap::new(),
                polling_active: false,
            }),
            rearm: Notify::new(),
            sink,
        }
    }

    fn lock(&self) -> MutexGuard<'_, WatchState> {
        self.watched.lock().expect("Tracker lock poisoned")
    }

    /// Start watching a machine for settlement after a command was accepted.
    /// Idempotent: a second call before settlement just resets the baseline.
    /// Arms the poll scheduler as a side effect.
    pub fn begin_awaiting(&self, machine_id: &str) {
        {
            let mut watched = self.lock();
            watched
                .entries
                .insert(machine_id.to_string(), MachineState::Unknown);
            watched.polling_active = true;
        }
        self.rearm.notify_one();
        debug!("Awaiting settlement for '{}'", machine_id);
    }

    /// Diff one poll's snapshots against the watched set.
    ///
    /// For every watched machine present in the batch: a state delta emits
    /// one notification; a settled delta also removes the entry. A repeat of
    /// an unsettled state stays watched silently. Machines absent from the
    /// batch (disappeared or renamed on the host) are left as-is.
    pub fn observe(&self, snapshots: &[MachineSnapshot]) {
        let mut pending = Vec::new();
        {
            let mut watched = self.lock();
            for snap in snapshots {
                let Some(last) = watched.entries.get(&snap.id).copied() else {
                    continue;
                };
                let current = MachineState::classify(snap.raw_state);

                if current != last {
                    pending.push((snap.id.clone(), current));
                    if current.is_settled() {
                        watched.entries.remove(&snap.id);
                        info!("'{}' settled at {}", snap.id, current);
                    } else {
                        watched.entries.insert(snap.id.clone(), current);
                    }
                } else if current.is_settled() {
                    // Stale entry already holding a settled state: clear it
                    // so the set self-heals instead of watching forever.
                    watched.entries.remove(&snap.id);
                }
            }

            if watched.entries.is_empty() && watched.polling_active {
                watched.polling_active = false;
                debug!("Watched set drained; polling disarmed");
            }
        }

        // Emit outside the lock so a slow sink never blocks dispatch.
        for (id, state) in pending {
            self.sink.notify(NOTIFY_TITLE, &format!("{} {}", id, state.label()));
        }
    }

    pub fn is_polling_active(&self) -> bool {
        self.lock().polling_active
    }

    pub fn watched_count(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_watched(&self, machine_id: &str) -> bool {
        self.lock().entries.contains_key(machine_id)
    }

    /// Park until `begin_awaiting` arms polling. Returns immediately if
    /// already armed.
    pub async fn wait_until_armed(&self) {
        loop {
            if self.is_polling_active() {
                return;
            }
            self.rearm.notified().await;
        }
    }
}

//! Poll scheduling - the periodic fetch-and-observe loop
//!
//! One owned object driving one tokio task, so ticks are strictly
//! sequential: the next interval wait starts only after the previous
//! observe has run to completion. No shared timers, no globals.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, trace, warn};

use super::tracker::TransitionTracker;
use crate::provider::{MachineInventory, MenuVisibility};

/// Default poll cadence, matching the reference monitor.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4500);

pub struct PollScheduler {
    tracker: Arc<TransitionTracker>,
    inventory: Arc<dyn MachineInventory>,
    visibility: Arc<dyn MenuVisibility>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl PollScheduler {
    pub fn new(
        tracker: Arc<TransitionTracker>,
        inventory: Arc<dyn MachineInventory>,
        visibility: Arc<dyn MenuVisibility>,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            tracker,
            inventory,
            visibility,
            interval,
            shutdown,
        }
    }

    /// Run until shutdown is signalled. While nothing is being watched the
    /// loop parks without fetching; `begin_awaiting` re-arms it. Shutdown
    /// interrupts a pending wait immediately but never an observe in
    /// progress, so a tick is applied fully or not at all.
    pub async fn run(mut self) {
        debug!("Poll scheduler started (interval {:?})", self.interval);
        loop {
            tokio::select! {
                _ = self.tracker.wait_until_armed() => {}
                _ = shutdown_requested(&mut self.shutdown) => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown_requested(&mut self.shutdown) => break,
            }

            // Armed when we went to sleep, but the set may have drained since.
            if !self.tracker.is_polling_active() {
                continue;
            }

            if self.visibility.is_menu_open() {
                trace!("Menu open; skipping tick");
                continue;
            }

            self.tick();
        }
        debug!("Poll scheduler stopped");
    }

    /// One tick: fetch inventory and let the tracker diff it. A failed fetch
    /// abandons the tick with tracker state untouched; the next tick is the
    /// only retry.
    fn tick(&self) {
        match self.inventory.list_machines() {
            Ok(snapshots) => {
                trace!("Tick observed {} machines", snapshots.len());
                self.tracker.observe(&snapshots);
            }
            Err(e) => warn!("Inventory fetch failed, abandoning tick: {}", e),
        }
    }
}

/// Resolves when shutdown is requested. A dropped sender counts as shutdown.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::core::machine::MachineSnapshot;
    use crate::provider::{InventoryError, MenuGate, NotificationSink};

    /// Inventory that counts fetches and reports a fixed state per machine.
    struct FixedInventory {
        fetches: AtomicUsize,
        machines: Mutex<Vec<(String, u16)>>,
    }

    impl FixedInventory {
        fn new(machines: Vec<(&str, u16)>) -> Arc<Self> {
            Arc::new(Self {
                fetches: AtomicUsize::new(0),
                machines: Mutex::new(
                    machines
                        .into_iter()
                        .map(|(id, raw)| (id.to_string(), raw))
                        .collect(),
                ),
            })
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl MachineInventory for FixedInventory {
        fn list_machines(&self) -> Result<Vec<MachineSnapshot>, InventoryError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .machines
                .lock()
                .unwrap()
                .iter()
                .map(|(id, raw)| MachineSnapshot::new(id.clone(), *raw))
                .collect())
        }

        fn request_transition(
            &self,
            _machine_id: &str,
            _target: crate::core::MachineState,
        ) -> Result<(), InventoryError> {
            Ok(())
        }
    }

    struct NullSink;
    impl NotificationSink for NullSink {
        fn notify(&self, _title: &str, _body: &str) {}
    }

    fn harness(
        inventory: Arc<FixedInventory>,
        menu: Arc<MenuGate>,
    ) -> (Arc<TransitionTracker>, watch::Sender<bool>, tokio::task::JoinHandle<()>) {
        let tracker = Arc::new(TransitionTracker::new(Arc::new(NullSink)));
        let (tx, rx) = watch::channel(false);
        let scheduler = PollScheduler::new(
            Arc::clone(&tracker),
            inventory,
            menu,
            Duration::from_millis(20),
            rx,
        );
        let task = tokio::spawn(scheduler.run());
        (tracker, tx, task)
    }

    #[tokio::test]
    async fn no_fetches_while_disarmed() {
        let inventory = FixedInventory::new(vec![("VM1", 3)]);
        let (_tracker, tx, task) = harness(Arc::clone(&inventory), Arc::new(MenuGate::new()));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(inventory.fetch_count(), 0);

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn arming_starts_ticks_and_settlement_stops_them() {
        // Machine already Running: the first observe settles it immediately.
        let inventory = FixedInventory::new(vec![("VM1", 2)]);
        let (tracker, tx, task) = harness(Arc::clone(&inventory), Arc::new(MenuGate::new()));

        tracker.begin_awaiting("VM1");
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!tracker.is_polling_active());
        let after_settle = inventory.fetch_count();
        assert!(after_settle >= 1);

        // Disarmed: fetch count must not move anymore.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(inventory.fetch_count(), after_settle);

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn open_menu_suppresses_ticks() {
        let inventory = FixedInventory::new(vec![("VM1", 2)]);
        let menu = Arc::new(MenuGate::new());
        menu.set_open(true);
        let (tracker, tx, task) = harness(Arc::clone(&inventory), Arc::clone(&menu));

        tracker.begin_awaiting("VM1");
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(inventory.fetch_count(), 0);
        assert!(tracker.is_polling_active());

        // Closing the menu lets the next tick through.
        menu.set_open(false);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(inventory.fetch_count() >= 1);

        tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_interrupts_pending_wait() {
        let inventory = FixedInventory::new(vec![]);
        let tracker = Arc::new(TransitionTracker::new(Arc::new(NullSink)));
        let (tx, rx) = watch::channel(false);
        let scheduler = PollScheduler::new(
            Arc::clone(&tracker),
            inventory,
            Arc::new(MenuGate::new()),
            Duration::from_secs(3600),
            rx,
        );
        let task = tokio::spawn(scheduler.run());
        tracker.begin_awaiting("VM1");

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("scheduler should stop without waiting out the interval")
            .unwrap();
    }
}

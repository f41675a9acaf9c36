//! Background lease sweeper.
//!
//! Lease reclamation already happens lazily on every dequeue and list,
//! so the broker is correct without this task. The sweeper exists for
//! convergence when nobody is consuming: expired leases become visible
//! (and get logged) on a bounded interval instead of waiting for the
//! next caller.

use std::sync::Arc;

use courier_queue::QueueStore;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clock::Clock;

/// Background task reclaiming expired leases across all queues.
pub(crate) async fn sweep_task(
    queues: Arc<QueueStore>,
    clock: Clock,
    interval_us: u64,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let mut interval = tokio::time::interval(tokio::time::Duration::from_micros(interval_us));

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                debug!("Sweep task shutting down");
                break;
            }
            _ = interval.tick() => {
                let reclaimed = queues.reclaim_expired(clock.now_us());
                if reclaimed > 0 {
                    info!(reclaimed, "Sweeper made expired leases visible again");
                }
            }
        }
    }
}

/// Handle to a running sweeper.
///
/// Dropping the handle also stops the task (the shutdown sender goes
/// away and the task's receive arm completes); [`SweeperHandle::shutdown`]
/// additionally waits for the task to finish.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl SweeperHandle {
    /// Spawns the sweep task on the current tokio runtime.
    pub(crate) fn spawn(queues: Arc<QueueStore>, clock: Clock, interval_us: u64) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let task = tokio::spawn(sweep_task(queues, clock, interval_us, shutdown_rx));
        Self { shutdown_tx, task }
    }

    /// Stops the sweeper and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}

//! Scheduled execution.
//!
//! Wraps a [`ProgressTracker`] in an immediate-then-periodic loop. The
//! loop is an explicit, stoppable task rather than a bare timer: tests
//! run a bounded number of cycles through [`Scheduler::run_cycles`], and
//! the binary holds a [`SchedulerHandle`] it can stop on shutdown.
//!
//! Cycles are serialized. A cycle runs to completion before the next
//! tick is honored, and missed ticks are delayed rather than bursted,
//! so a slow cycle shifts the schedule instead of overlapping it.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::tracker::ProgressTracker;

/// Immediate-plus-periodic cycle runner.
#[derive(Debug)]
pub struct Scheduler {
    tracker: ProgressTracker,
}

impl Scheduler {
    /// Create a scheduler around a tracker.
    pub fn new(tracker: ProgressTracker) -> Self {
        Self { tracker }
    }

    /// Run one guarded cycle: failures are logged, never propagated, so
    /// one bad cycle cannot stop the loop.
    fn run_guarded(&self) {
        if let Err(e) = self.tracker.run_cycle() {
            error!("Cycle failed: {e}");
        }
    }

    /// Run exactly `count` cycles back to back, without the timer.
    ///
    /// The deterministic entry point for tests and one-shot runs; uses
    /// the same guarded cycle as the periodic loop.
    pub fn run_cycles(&self, count: usize) {
        for _ in 0..count {
            self.run_guarded();
        }
    }

    /// Start the periodic loop on the runtime.
    ///
    /// Runs one cycle immediately, then one per interval tick until the
    /// returned handle is stopped.
    pub fn spawn(self) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let interval = self.tracker.config().update_interval();

        let task = tokio::spawn(async move {
            info!(
                "Progress tracker started; updating every {}s",
                interval.as_secs()
            );

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately,
            // which is exactly the run-once-then-periodically contract.
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.run_guarded(),
                    _ = stop_rx.changed() => {
                        info!("Progress tracker stopping");
                        break;
                    }
                }
            }
        });

        SchedulerHandle { stop_tx, task }
    }
}

/// Handle to a running scheduler loop.
#[derive(Debug)]
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the loop and wait for it to finish.
    ///
    /// A cycle already in flight completes before the loop exits.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }

    /// Wait for the loop without stopping it (it only ends via
    /// [`SchedulerHandle::stop`] or runtime shutdown).
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

//! Background task that actively removes expired entries.
//!
//! Lazy expiry only reclaims keys that somebody reads. The sweeper covers the
//! rest: on a fixed interval it takes the store's write lock and drops every
//! entry whose deadline has passed, so an unread expired key occupies memory
//! for at most one interval.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::store::{remove_expired, SharedMap};

/// Lifecycle of the background sweeper.
///
/// Transitions only move forward: `Created -> Running -> Stopped`.
/// A sweeper stopped before it was started goes straight to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweeperState {
    Created,
    Running,
    Stopped,
}

struct Lifecycle {
    state: SweeperState,
    handle: Option<JoinHandle<()>>,
    // Moved into the sweep loop on start; dropped when the loop is gone.
    exited_tx: Option<watch::Sender<()>>,
}

pub(crate) struct Sweeper {
    interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    exited_rx: watch::Receiver<()>,
    lifecycle: Mutex<Lifecycle>,
}

impl Sweeper {
    pub(crate) fn new(interval: Duration) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let (exited_tx, exited_rx) = watch::channel(());

        Self {
            interval,
            shutdown_tx,
            exited_rx,
            lifecycle: Mutex::new(Lifecycle {
                state: SweeperState::Created,
                handle: None,
                exited_tx: Some(exited_tx),
            }),
        }
    }

    /// Spawns the sweep loop over `data`. Has no effect unless the sweeper is
    /// still in `Created`.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn start(&self, data: Arc<SharedMap>) {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != SweeperState::Created {
            return;
        }

        let shutdown_rx = self.shutdown_tx.subscribe();
        let exited_tx = lifecycle.exited_tx.take();
        lifecycle.handle = Some(tokio::spawn(run(data, self.interval, shutdown_rx, exited_tx)));
        lifecycle.state = SweeperState::Running;
        tracing::debug!("sweeper started (interval: {:?})", self.interval);
    }

    /// Signals the sweep loop to exit and waits until it has.
    ///
    /// Safe to call repeatedly or concurrently. Every call returns only once
    /// the loop has exited; the first one also reports how the task ended.
    pub(crate) async fn stop(&self) {
        let handle = {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.state == SweeperState::Stopped {
                None
            } else {
                lifecycle.state = SweeperState::Stopped;
                // Never started: nothing will drop the sender for us.
                lifecycle.exited_tx = None;
                lifecycle.handle.take()
            }
        };

        let _ = self.shutdown_tx.send(true);

        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                tracing::warn!("sweeper task ended abnormally: {}", err);
            } else {
                tracing::debug!("sweeper stopped");
            }
        }

        // Nothing is ever sent on this channel; it only closes.
        let mut exited = self.exited_rx.clone();
        let _ = exited.changed().await;
    }

    /// True once the sweep loop is gone, or was never started and has been
    /// stopped.
    #[cfg(test)]
    pub(crate) fn has_exited(&self) -> bool {
        self.exited_rx.has_changed().is_err()
    }

    pub(crate) fn state(&self) -> SweeperState {
        self.lifecycle.lock().state
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        // Nobody can await the task any more; just tell it to exit.
        let _ = self.shutdown_tx.send(true);
    }
}

async fn run(
    data: Arc<SharedMap>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
    _exited_tx: Option<watch::Sender<()>>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; sweeping an empty store is pointless.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = remove_expired(&data);
                if removed > 0 {
                    tracing::debug!(removed, "swept expired entries");
                }
            }
            changed = shutdown_rx.changed() => {
                // A dropped sender means the owning store is gone.
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
}

//! Periodic usage reporter

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::service::DataService;

/// Default interval between status lines
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterState {
    Running,
    Stopped,
}

/// Logs [`DataService::current_stats`] once per interval until cancelled.
pub struct StatsReporter {
    service: Arc<DataService>,
    interval: Duration,
    cancel: CancellationToken,
    state: watch::Sender<ReporterState>,
}

impl StatsReporter {
    pub fn new(service: Arc<DataService>, interval: Duration, cancel: CancellationToken) -> Self {
        let (state, _) = watch::channel(ReporterState::Running);
        Self {
            service,
            interval,
            cancel,
            state,
        }
    }

    /// Watch the reporter's lifecycle state
    pub fn subscribe(&self) -> watch::Receiver<ReporterState> {
        self.state.subscribe()
    }

    /// Run the reporting loop on the current task.
    ///
    /// Returns the number of status lines emitted once the token is cancelled.
    pub async fn run(self) -> u64 {
        // First line one full interval after start, not immediately.
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval = ?self.interval, "Background worker started");
        let mut emitted = 0;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let stats = self.service.current_stats();
                    info!(
                        total_requests = stats.total_requests,
                        database_size = stats.database_size,
                        "Status - Requests: {}, Database size: {}",
                        stats.total_requests,
                        stats.database_size
                    );
                    emitted += 1;
                }
            }
        }

        drop(ticker);
        self.state.send_replace(ReporterState::Stopped);
        info!(emitted, "Background worker stopped");
        emitted
    }

    /// Spawn the loop onto the tokio runtime
    pub fn spawn(self) -> ReporterHandle {
        let state = self.subscribe();
        let task = tokio::spawn(self.run());
        ReporterHandle { state, task }
    }
}

/// Handle to a spawned [`StatsReporter`]
pub struct ReporterHandle {
    state: watch::Receiver<ReporterState>,
    task: JoinHandle<u64>,
}

impl ReporterHandle {
    pub fn state(&self) -> ReporterState {
        *self.state.borrow()
    }

    /// Wait for the loop to exit, yielding the number of status lines emitted
    pub async fn join(self) -> Result<u64, JoinError> {
        self.task.await
    }
}

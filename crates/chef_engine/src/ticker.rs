use std::time::Duration;

use chef_logging::chef_debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// Fixed-period tick source. Calls `on_tick` with a running count starting
/// at 1 until stopped or dropped.
pub struct TickDriver {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl TickDriver {
    pub fn start<F>(runtime: &Handle, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let stopped = cancel.clone();
        let task = runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            let mut ticks: u64 = 0;
            loop {
                tokio::select! {
                    biased;
                    _ = stopped.cancelled() => break,
                    _ = interval.tick() => {
                        ticks += 1;
                        on_tick(ticks);
                    }
                }
            }
            chef_debug!("Tick driver stopped after {} ticks", ticks);
        });
        Self { cancel, task }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

//! Periodic block-statistics publisher.
//!
//! The ticker owns its store and sink and runs as one tokio task. It never
//! touches the request path; a failed read is logged and the next tick
//! tries again.

use crate::metrics::MetricSink;
use jetsam_kernel::BlockStats;
use jetsam_ledger::{BlockStore, StoreError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(30);

/// Handle to a running ticker task.
#[derive(Debug)]
pub struct StatsTicker {
    shutdown_token: CancellationToken,
    task: JoinHandle<()>,
}

impl StatsTicker {
    /// Start publishing on `runtime`. The first tick fires one `period`
    /// after spawning.
    pub fn spawn<S, M>(runtime: &Handle, store: S, sink: M, period: Duration) -> Self
    where
        S: BlockStore + Send + 'static,
        M: MetricSink + Send + 'static,
    {
        let shutdown_token = CancellationToken::new();
        let task = runtime.spawn(run(store, sink, period, shutdown_token.clone()));
        Self {
            shutdown_token,
            task,
        }
    }

    /// Cancel at the next tick boundary and wait for the task to finish.
    pub async fn stop(self) {
        self.shutdown_token.cancel();
        if let Err(err) = self.task.await {
            warn!(error = %err, "stats ticker task ended abnormally");
        }
    }
}

async fn run<S, M>(store: S, sink: M, period: Duration, shutdown_token: CancellationToken)
where
    S: BlockStore,
    M: MetricSink,
{
    info!(period_secs = period.as_secs_f64(), "stats ticker started");
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => break,
            _ = interval.tick() => {
                if let Err(err) = publish(&store, &sink) {
                    warn!(error = %err, "block stats unavailable");
                }
            }
        }
    }
    info!("stats ticker stopped");
}

/// Read block stats once and record them as three gauges.
pub fn publish<S, M>(store: &S, sink: &M) -> Result<BlockStats, StoreError>
where
    S: BlockStore,
    M: MetricSink,
{
    let stats = store.block_stats()?;
    sink.record("block_latest", stats.latest);
    sink.record("block_highest_index", stats.highest_index);
    sink.record("block_behind", stats.behind);
    Ok(stats)
}

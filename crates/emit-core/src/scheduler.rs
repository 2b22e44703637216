//! Runs initialized emitters concurrently until they all stop.

use crate::sink::Sink;
use crate::task::{EmitterTask, StopReason, TaskReport};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// A stopped emitter together with the sink it still owns.
pub struct FinishedTask {
    pub report: TaskReport,
    pub sink: Box<dyn Sink>,
}

pub struct Scheduler {
    tasks: Vec<EmitterTask>,
    cancel: CancellationToken,
}

impl Scheduler {
    /// Schedule `tasks`; cancelling `cancel` interrupts all of them.
    pub fn new(tasks: Vec<EmitterTask>, cancel: CancellationToken) -> Self {
        Self { tasks, cancel }
    }

    /// Start every task and wait for all of them to stop.
    ///
    /// Results come back in the order the tasks were given. A task whose
    /// pass panicked stops with [`StopReason::Panicked`] and still hands
    /// back its sink, so it gets closed like every other one.
    pub async fn run(self) -> Vec<FinishedTask> {
        let total = self.tasks.len();
        info!("Starting {} emitters", total);

        let mut set = JoinSet::new();
        for (position, task) in self.tasks.into_iter().enumerate() {
            let cancel = self.cancel.child_token();
            set.spawn(async move {
                let mut task = task;
                let outcome = AssertUnwindSafe(task.drive(&cancel)).catch_unwind().await;
                let stop = outcome.unwrap_or_else(|_| {
                    error!("Emitter '{}' panicked, stopping it", task.name());
                    StopReason::Panicked
                });
                let (report, sink) = task.finish(stop);
                (position, FinishedTask { report, sink })
            });
        }

        let mut finished = Vec::with_capacity(total);
        while let Some(result) = set.join_next().await {
            match result {
                Ok(entry) => finished.push(entry),
                Err(e) => error!("Emitter task failed: {e}"),
            }
        }

        finished.sort_by_key(|(position, _)| *position);
        finished.into_iter().map(|(_, task)| task).collect()
    }
}

/// Close every sink one after another. Close failures are logged and
/// do not stop the remaining sinks from closing.
pub async fn close_sinks(finished: &[FinishedTask]) {
    for task in finished {
        if let Err(e) = task.sink.close().await {
            warn!("Failed to close sink of emitter '{}': {e}", task.report.name);
        }
    }
}

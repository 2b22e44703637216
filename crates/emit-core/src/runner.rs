//! A complete generation run: initialize, preload, schedule, close.

use crate::context::GenerationContext;
use crate::definition::EmitterDefinition;
use crate::error::EmitError;
use crate::scheduler::{close_sinks, Scheduler};
use crate::sink::SinkRegistry;
use crate::stats::GenerationStats;
use crate::task::{EmitterTask, RunOptions, TaskReport};
use emit_template::FunctionLibrary;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: GenerationStats,
    pub tasks: Vec<TaskReport>,
    /// Emitters skipped because they failed to initialize.
    pub failed: usize,
}

/// Reject definitions sharing a name.
pub fn check_unique_names(definitions: &[EmitterDefinition]) -> Result<(), EmitError> {
    let mut seen = HashSet::new();
    for definition in definitions {
        if !seen.insert(definition.name.as_str()) {
            return Err(EmitError::DuplicateName(definition.name.clone()));
        }
    }
    Ok(())
}

/// Run every selected emitter until all of them stop or `cancel` fires.
///
/// Emitters that fail to initialize are logged and skipped; the run only
/// fails when none is left. Sinks are closed once every emitter stopped.
pub async fn run(
    definitions: &[EmitterDefinition],
    options: &RunOptions,
    registry: &SinkRegistry,
    cancel: CancellationToken,
) -> Result<RunSummary, EmitError> {
    check_unique_names(definitions)?;

    for name in &options.only {
        if !definitions.iter().any(|d| &d.name == name) {
            warn!("No emitter named '{}' is configured", name);
        }
    }

    let context = Arc::new(GenerationContext::new());
    let library = FunctionLibrary::standard();
    info!("Run started at {}", context.started_at().to_rfc3339());

    let mut tasks = Vec::new();
    let mut failed = 0;
    for (position, definition) in definitions.iter().enumerate() {
        if !options.only.is_empty() && !options.only.contains(&definition.name) {
            continue;
        }

        match EmitterTask::initialize(
            definition,
            position,
            options,
            &library,
            registry,
            Arc::clone(&context),
        )
        .await
        {
            Ok(mut task) => {
                task.preload().await;
                tasks.push(task);
            }
            Err(e) => {
                error!("Skipping emitter: {e}");
                failed += 1;
            }
        }
    }

    if tasks.is_empty() {
        return Err(EmitError::NoEmitters { failed });
    }

    let finished = Scheduler::new(tasks, cancel).run().await;

    info!("All emitters stopped, closing sinks");
    close_sinks(&finished).await;

    Ok(RunSummary {
        stats: context.snapshot(),
        tasks: finished.into_iter().map(|task| task.report).collect(),
        failed,
    })
}

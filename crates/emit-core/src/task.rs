//! Resolved emitters and their execution loop.
//!
//! An [`EmitterTask`] owns everything one emitter needs: parsed templates,
//! its render state and its sink. Running a task consumes it and hands the
//! sink back, so the caller closes every sink exactly once.

use crate::context::GenerationContext;
use crate::definition::EmitterDefinition;
use crate::error::InitError;
use crate::sink::{Sink, SinkRegistry};
use emit_template::{FunctionLibrary, RenderContext, RenderState, Template};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Settings shared by every emitter of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory holding `<name>.tpl` value templates.
    pub template_dir: PathBuf,
    /// Base seed; each emitter derives its own from it.
    pub seed: u64,
    /// Emitters to run; empty means all of them.
    pub only: Vec<String>,
}

/// Seed of the emitter at `position` in the configuration.
pub fn emitter_seed(seed: u64, position: usize) -> u64 {
    seed.wrapping_add((position as u64).wrapping_mul(0x9E3779B97F4A7C15))
}

/// How an emitter fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// A single pass, right away.
    Once,
    /// One pass per period, first one a period after start.
    Every(Duration),
}

/// Why an emitter stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Its single pass is done.
    Completed,
    /// Its lifetime elapsed.
    Expired,
    /// The run was interrupted.
    Interrupted,
    /// A pass panicked; the emitter produced nothing after it.
    Panicked,
}

/// Outcome of one emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub name: String,
    /// Scheduled passes executed (preload not included).
    pub passes: u64,
    /// Records produced, preload included.
    pub records: u64,
    pub stop: StopReason,
}

pub struct EmitterTask {
    name: String,
    locale: String,
    records_per_pass: u64,
    schedule: Schedule,
    lifetime: Option<Duration>,
    preload: u64,
    oneline: bool,
    key: Template,
    value: Template,
    state: RenderState,
    sink: Box<dyn Sink>,
    context: Arc<GenerationContext>,
    passes: u64,
    records: u64,
}

impl EmitterTask {
    /// Resolve a definition: parse its templates once and build its sink.
    ///
    /// Preload is not run here, see [`EmitterTask::preload`].
    pub async fn initialize(
        definition: &EmitterDefinition,
        position: usize,
        options: &RunOptions,
        library: &FunctionLibrary,
        registry: &SinkRegistry,
        context: Arc<GenerationContext>,
    ) -> Result<Self, InitError> {
        let definition = definition.normalized();
        definition.validate()?;

        let template_error = |source| InitError::Template {
            emitter: definition.name.clone(),
            source,
        };

        let value_source = definition.value_source(&options.template_dir)?;
        let key = Template::parse("key", &definition.key_template, library).map_err(template_error)?;
        let value = Template::parse("value", &value_source, library).map_err(template_error)?;

        let sink = registry
            .build(&definition)
            .await
            .map_err(|source| InitError::Sink {
                emitter: definition.name.clone(),
                source,
            })?;

        let schedule = match definition.frequency {
            Some(period) => Schedule::Every(period),
            None => Schedule::Once,
        };

        info!(
            "Initialized emitter '{}' (output={}, locale={}, num={}, schedule={:?}, lifetime={:?})",
            definition.name,
            definition.output,
            definition.locale,
            definition.num,
            schedule,
            definition.duration
        );

        Ok(Self {
            name: definition.name.clone(),
            locale: definition.locale.clone(),
            records_per_pass: definition.num,
            schedule,
            lifetime: definition.duration,
            preload: definition.preload,
            oneline: definition.oneline,
            key,
            value,
            state: RenderState::new(emitter_seed(options.seed, position)),
            sink,
            context,
            passes: 0,
            records: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Send the configured preload records straight to the sink, one record
    /// per pass.
    pub async fn preload(&mut self) {
        if self.preload == 0 {
            return;
        }
        for _ in 0..self.preload {
            self.run_pass(1).await;
        }
        info!("Emitter '{}' preloaded {} records", self.name, self.preload);
    }

    /// Run until the emitter stops, then give back its report and sink.
    ///
    /// Cancellation is only observed between passes; a pass that started
    /// always finishes.
    pub async fn run(mut self, cancel: CancellationToken) -> (TaskReport, Box<dyn Sink>) {
        let stop = self.drive(&cancel).await;
        self.finish(stop)
    }

    /// Execute the schedule in place, leaving the task to be finished.
    pub(crate) async fn drive(&mut self, cancel: &CancellationToken) -> StopReason {
        match self.schedule {
            Schedule::Once => {
                self.run_scheduled_pass().await;
                StopReason::Completed
            }
            Schedule::Every(period) => self.run_periodic(period, cancel).await,
        }
    }

    pub(crate) fn finish(self, stop: StopReason) -> (TaskReport, Box<dyn Sink>) {
        info!(
            "Emitter '{}' stopped ({:?}) after {} passes, {} records",
            self.name, stop, self.passes, self.records
        );

        let report = TaskReport {
            name: self.name,
            passes: self.passes,
            records: self.records,
            stop,
        };
        (report, self.sink)
    }

    async fn run_periodic(&mut self, period: Duration, cancel: &CancellationToken) -> StopReason {
        let lifetime = self.lifetime;
        let deadline = async move {
            match lifetime {
                Some(lifetime) => tokio::time::sleep(lifetime).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => return StopReason::Interrupted,
                _ = &mut deadline => return StopReason::Expired,
                _ = ticker.tick() => self.run_scheduled_pass().await,
            }
        }
    }

    async fn run_scheduled_pass(&mut self) {
        self.run_pass(self.records_per_pass).await;
        self.passes += 1;
        debug!("Emitter '{}' finished pass {}", self.name, self.passes);
    }

    /// Render and produce `records` records with this emitter's locale.
    async fn run_pass(&mut self, records: u64) {
        let render_context = RenderContext::new(&self.locale);

        for _ in 0..records {
            let key = self
                .key
                .render(&mut self.state, &render_context)
                .unwrap_or_else(|e| {
                    warn!("Emitter '{}': failed to render key: {e}", self.name);
                    String::new()
                });
            let mut value = self
                .value
                .render(&mut self.state, &render_context)
                .unwrap_or_else(|e| {
                    warn!("Emitter '{}': failed to render value: {e}", self.name);
                    String::new()
                });
            if self.oneline {
                value.retain(|c| c != '\n' && c != '\r');
            }

            self.sink
                .produce(key.as_bytes(), value.as_bytes(), None)
                .await;

            self.context.record(value.len());
            self.state.advance();
            self.records += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, MemorySinkHandle};

    fn options() -> RunOptions {
        RunOptions {
            template_dir: PathBuf::from("."),
            seed: 42,
            only: Vec::new(),
        }
    }

    fn memory_registry(handle: &MemorySinkHandle) -> SinkRegistry {
        let handle = handle.clone();
        let mut registry = SinkRegistry::new();
        registry.register("memory", move |_: &EmitterDefinition| {
            let sink = handle.sink();
            async move { Ok::<_, crate::error::SinkError>(Box::new(sink) as Box<dyn Sink>) }
        });
        registry
    }

    fn definition(name: &str, template: &str) -> EmitterDefinition {
        EmitterDefinition {
            name: name.to_string(),
            embedded_template: Some(template.to_string()),
            output: "memory".to_string(),
            ..Default::default()
        }
    }

    async fn task(definition: &EmitterDefinition, handle: &MemorySinkHandle) -> EmitterTask {
        EmitterTask::initialize(
            definition,
            0,
            &options(),
            &FunctionLibrary::standard(),
            &memory_registry(handle),
            Arc::new(GenerationContext::new()),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_once_produces_one_pass() {
        let handle = MemorySink::new().handle();
        let definition = EmitterDefinition {
            num: 5,
            duration: Some(Duration::from_secs(10)),
            ..definition("once", "0123456789")
        };

        let task = task(&definition, &handle).await;
        assert_eq!(task.schedule(), Schedule::Once);

        let (report, _sink) = task.run(CancellationToken::new()).await;
        assert_eq!(report.stop, StopReason::Completed);
        assert_eq!(report.passes, 1);
        assert_eq!(report.records, 5);
        assert_eq!(handle.produced(), 5);
    }

    #[tokio::test]
    async fn test_oneline_strips_line_breaks() {
        let handle = MemorySink::new().handle();
        let definition = EmitterDefinition {
            oneline: true,
            ..definition("oneline", "{\n  \"a\": 1\r\n}\n")
        };

        let (_, _sink) = task(&definition, &handle).await.run(CancellationToken::new()).await;
        assert_eq!(handle.values(), vec!["{  \"a\": 1}"]);
    }

    #[tokio::test]
    async fn test_render_error_yields_empty_value() {
        let handle = MemorySink::new().handle();
        let definition = EmitterDefinition {
            locale: "tlh".to_string(),
            num: 2,
            ..definition("klingon", "{{city}}")
        };

        let (report, _sink) = task(&definition, &handle).await.run(CancellationToken::new()).await;
        assert_eq!(report.records, 2);
        assert_eq!(handle.values(), vec!["", ""]);
    }

    #[tokio::test]
    async fn test_index_advances_per_record() {
        let handle = MemorySink::new().handle();
        let definition = EmitterDefinition {
            num: 3,
            key_template: "k{{index}}".to_string(),
            ..definition("indexed", "v{{index}}")
        };

        let (_, _sink) = task(&definition, &handle).await.run(CancellationToken::new()).await;
        let keys: Vec<_> = handle.records().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![b"k0".to_vec(), b"k1".to_vec(), b"k2".to_vec()]);
        assert_eq!(handle.values(), vec!["v0", "v1", "v2"]);
    }

    #[tokio::test]
    async fn test_parse_error_is_init_error() {
        let handle = MemorySink::new().handle();
        let result = EmitterTask::initialize(
            &definition("broken", "{{nope}}"),
            0,
            &options(),
            &FunctionLibrary::standard(),
            &memory_registry(&handle),
            Arc::new(GenerationContext::new()),
        )
        .await;

        assert!(matches!(result, Err(InitError::Template { .. })));
        assert_eq!(handle.produced(), 0);
    }

    #[tokio::test]
    async fn test_unknown_output_is_init_error() {
        let handle = MemorySink::new().handle();
        let definition = EmitterDefinition {
            output: "nowhere".to_string(),
            ..definition("lost", "v")
        };
        let result = EmitterTask::initialize(
            &definition,
            0,
            &options(),
            &FunctionLibrary::standard(),
            &memory_registry(&handle),
            Arc::new(GenerationContext::new()),
        )
        .await;

        assert!(matches!(result, Err(InitError::Sink { .. })));
    }

    #[tokio::test]
    async fn test_same_seed_same_records() {
        let first = MemorySink::new().handle();
        let second = MemorySink::new().handle();
        let definition = EmitterDefinition {
            num: 4,
            ..definition("seeded", "{{uuid}}-{{name}}")
        };

        let (_, _a) = task(&definition, &first).await.run(CancellationToken::new()).await;
        let (_, _b) = task(&definition, &second).await.run(CancellationToken::new()).await;
        assert_eq!(first.values(), second.values());
    }

    #[test]
    fn test_emitter_seeds_differ_by_position() {
        assert_eq!(emitter_seed(42, 0), 42);
        assert_ne!(emitter_seed(42, 1), emitter_seed(42, 2));
    }
}

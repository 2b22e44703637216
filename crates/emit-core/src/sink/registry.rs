//! Maps output labels to sink constructors.
//!
//! Backends register themselves under one or more labels; an emitter's
//! `output` field picks the constructor at initialization time.

use super::console::ConsoleSink;
use super::memory::MemorySink;
use super::Sink;
use crate::definition::EmitterDefinition;
use crate::error::SinkError;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a sink constructor.
pub type SinkFuture = BoxFuture<'static, Result<Box<dyn Sink>, SinkError>>;

/// Builds a sink for an emitter definition.
pub type SinkConstructor = Arc<dyn Fn(&EmitterDefinition) -> SinkFuture + Send + Sync>;

#[derive(Clone, Default)]
pub struct SinkRegistry {
    constructors: HashMap<String, SinkConstructor>,
    fallback: Option<SinkConstructor>,
}

impl SinkRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the sinks that need no backend: `stdout` and `memory`.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();

        registry.register("stdout", |definition: &EmitterDefinition| {
            let sink = ConsoleSink::new(&definition.output_template);
            async move { sink.map(|s| Box::new(s) as Box<dyn Sink>) }
        });
        registry.register("memory", |_: &EmitterDefinition| async {
            Ok::<_, SinkError>(Box::new(MemorySink::new()) as Box<dyn Sink>)
        });

        registry
    }

    /// A registry that sends every emitter to a counting memory sink,
    /// whatever its output label.
    pub fn dry_run() -> Self {
        Self::new().with_fallback(|_: &EmitterDefinition| async {
            Ok::<_, SinkError>(Box::new(MemorySink::discarding()) as Box<dyn Sink>)
        })
    }

    /// Register a constructor under `label` (case-insensitive), replacing
    /// any previous one.
    pub fn register<F, Fut>(&mut self, label: &str, constructor: F)
    where
        F: Fn(&EmitterDefinition) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Box<dyn Sink>, SinkError>> + Send + 'static,
    {
        self.constructors
            .insert(label.to_ascii_lowercase(), boxed(constructor));
    }

    /// Constructor used for labels nobody registered.
    pub fn with_fallback<F, Fut>(mut self, constructor: F) -> Self
    where
        F: Fn(&EmitterDefinition) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Box<dyn Sink>, SinkError>> + Send + 'static,
    {
        self.fallback = Some(boxed(constructor));
        self
    }

    /// Registered labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Build the sink selected by `definition.output`.
    pub async fn build(&self, definition: &EmitterDefinition) -> Result<Box<dyn Sink>, SinkError> {
        let label = definition.output.to_ascii_lowercase();
        let constructor = self
            .constructors
            .get(&label)
            .or(self.fallback.as_ref())
            .ok_or_else(|| SinkError::UnknownOutput(definition.output.clone()))?;

        constructor(definition).await
    }
}

fn boxed<F, Fut>(constructor: F) -> SinkConstructor
where
    F: Fn(&EmitterDefinition) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Box<dyn Sink>, SinkError>> + Send + 'static,
{
    Arc::new(move |definition: &EmitterDefinition| -> SinkFuture {
        Box::pin(constructor(definition))
    })
}

impl fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkRegistry")
            .field("labels", &self.labels())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

//! Error types for emitter initialization, sinks and runs.

use emit_template::TemplateError;
use thiserror::Error;

/// Errors reported by sink construction and shutdown.
///
/// Per-record produce failures are not represented here: sinks log those
/// themselves and keep going.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("unknown output '{0}'")]
    UnknownOutput(String),

    #[error("sink configuration error: {0}")]
    Config(String),

    #[error("sink connection error: {0}")]
    Connection(String),

    #[error("sink close error: {0}")]
    Close(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that prevent a single emitter from being scheduled.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("emitter '{emitter}': invalid definition: {reason}")]
    InvalidDefinition { emitter: String, reason: String },

    #[error("emitter '{emitter}': failed to read template {path}: {source}")]
    TemplateRead {
        emitter: String,
        path: String,
        source: std::io::Error,
    },

    #[error("emitter '{emitter}': {source}")]
    Template {
        emitter: String,
        source: TemplateError,
    },

    #[error("emitter '{emitter}': {source}")]
    Sink { emitter: String, source: SinkError },
}

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("no emitter could be initialized ({failed} failed)")]
    NoEmitters { failed: usize },

    #[error("duplicate emitter name '{0}'")]
    DuplicateName(String),
}

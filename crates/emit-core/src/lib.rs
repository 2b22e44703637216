//! Scheduling engine for datagen emitters.
//!
//! This crate turns emitter definitions into running tasks:
//!
//! - [`EmitterDefinition`] - One emitter as configured (YAML or flags)
//! - [`SinkRegistry`] - Output label to sink constructor mapping
//! - [`EmitterTask`] - A resolved emitter: parsed templates, RNG, sink
//! - [`Scheduler`] - Runs tasks concurrently under one cancellation token
//! - [`GenerationContext`] - Run-wide counters shared by all tasks
//!
//! # Architecture
//!
//! ```text
//! EmitterDefinition ──► EmitterTask::initialize ──► preload
//!                              │                       │
//!                       SinkRegistry::build            ▼
//!                                               Scheduler::run
//!                                                      │
//!                                  ┌───────────────────┼──────────────┐
//!                                  ▼                   ▼              ▼
//!                              task (once)     task (periodic)   task ...
//!                                  │                   │              │
//!                                  └──────► close_sinks ◄─────────────┘
//!                                                 │
//!                                                 ▼
//!                                          GenerationStats
//! ```
//!
//! [`runner::run`] wires the whole sequence together.

pub mod context;
pub mod definition;
pub mod duration;
pub mod error;
pub mod runner;
pub mod scheduler;
pub mod sink;
pub mod stats;
pub mod task;

pub use context::GenerationContext;
pub use definition::{EmitterDefinition, DEFAULT_LOCALE};
pub use error::{EmitError, InitError, SinkError};
pub use runner::{run, RunSummary};
pub use scheduler::{close_sinks, FinishedTask, Scheduler};
pub use sink::{ConsoleSink, MemorySink, MemorySinkHandle, OutputHint, Sink, SinkRegistry};
pub use stats::GenerationStats;
pub use task::{emitter_seed, EmitterTask, RunOptions, Schedule, StopReason, TaskReport};

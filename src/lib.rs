//! datagen
//!
//! A tool for generating random streaming data. Emitters render templates
//! at a configured pace and send the records to a sink: the console, Kafka,
//! Redis or MongoDB.
//!
//! # Crates
//!
//! - `emit_template` - Template parser and the seeded, locale-aware function library
//! - `emit_core` - Emitter definitions, sinks, scheduling and statistics
//! - `sink_kafka`, `sink_redis`, `sink_mongodb` - Sink backends
//!
//! # CLI Usage
//!
//! ```bash
//! # Run every emitter of a configuration file
//! datagen run --config datagen.yaml
//!
//! # Run only some of them, without touching any backend
//! datagen run --config datagen.yaml --emitter users --dry-run
//!
//! # One ad-hoc emitter, ten records every second for a minute
//! datagen exec --embedded '{"id": "{{uuid}}"}' -n 10 -f 1s -d 1m
//! ```

pub mod app;
pub mod config;
pub mod exec;
pub mod sinks;

pub use config::{Config, GlobalConfig};
pub use exec::ExecArgs;

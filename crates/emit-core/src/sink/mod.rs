//! The sink contract and the built-in sinks.
//!
//! A sink accepts rendered key/value bytes. `produce` is fire-and-forget:
//! a sink reports its own failures (through `tracing`) and must never take the
//! process down or block indefinitely. `close` is called exactly once per sink
//! after its emitter stopped.

pub mod console;
pub mod memory;
pub mod registry;

use crate::error::SinkError;
use async_trait::async_trait;
use std::time::Duration;

pub use console::ConsoleSink;
pub use memory::{MemorySink, MemorySinkHandle, Record};
pub use registry::{SinkConstructor, SinkFuture, SinkRegistry};

/// Optional per-record routing override. Sinks ignore variants that do not
/// apply to them. Emitters never set one.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputHint {
    /// Kafka topic to publish to instead of the configured one.
    Topic(String),
    /// MongoDB collection to insert into instead of the configured one.
    Collection(String),
    /// Expiry to use instead of the configured TTL.
    Ttl(Duration),
}

/// Destination of generated records.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Emit one record.
    async fn produce(&self, key: &[u8], value: &[u8], hint: Option<&OutputHint>);

    /// Flush and release the sink.
    async fn close(&self) -> Result<(), SinkError>;
}

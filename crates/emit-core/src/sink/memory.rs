//! In-memory sink. Keeps every produced record so callers can inspect what
//! an emitter sent, or only counts them when used for dry runs.

use super::{OutputHint, Sink};
use crate::error::SinkError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// One produced record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

#[derive(Debug, Default)]
struct Shared {
    records: Mutex<Vec<Record>>,
    produced: AtomicU64,
    closes: AtomicU64,
}

#[derive(Debug)]
pub struct MemorySink {
    shared: Arc<Shared>,
    retain: bool,
    fail_close: bool,
}

/// Read access to a memory sink's buffer, usable after the sink itself has
/// been handed to an emitter.
#[derive(Debug, Clone)]
pub struct MemorySinkHandle {
    shared: Arc<Shared>,
}

impl MemorySink {
    /// A sink that keeps every record.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            retain: true,
            fail_close: false,
        }
    }

    /// A sink that only counts records.
    pub fn discarding() -> Self {
        Self {
            retain: false,
            ..Self::new()
        }
    }

    /// Make `close` report an error.
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn handle(&self) -> MemorySinkHandle {
        MemorySinkHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySinkHandle {
    /// A new sink writing into the same buffer.
    pub fn sink(&self) -> MemorySink {
        MemorySink {
            shared: Arc::clone(&self.shared),
            retain: true,
            fail_close: false,
        }
    }

    pub fn records(&self) -> Vec<Record> {
        self.shared
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Produced values decoded as UTF-8 (lossily).
    pub fn values(&self) -> Vec<String> {
        self.records()
            .iter()
            .map(|r| String::from_utf8_lossy(&r.value).into_owned())
            .collect()
    }

    /// Number of `produce` calls, retained or not.
    pub fn produced(&self) -> u64 {
        self.shared.produced.load(Ordering::SeqCst)
    }

    /// Number of `close` calls.
    pub fn close_count(&self) -> u64 {
        self.shared.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn produce(&self, key: &[u8], value: &[u8], _hint: Option<&OutputHint>) {
        self.shared.produced.fetch_add(1, Ordering::SeqCst);
        if self.retain {
            self.shared
                .records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Record {
                    key: key.to_vec(),
                    value: value.to_vec(),
                });
        }
    }

    async fn close(&self) -> Result<(), SinkError> {
        self.shared.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(SinkError::Close("memory sink configured to fail".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_order() {
        let sink = MemorySink::new();
        let handle = sink.handle();

        sink.produce(b"null", b"one", None).await;
        sink.produce(b"k", b"two", None).await;

        assert_eq!(handle.values(), vec!["one", "two"]);
        assert_eq!(handle.records()[0].key, b"null".to_vec());
        assert_eq!(handle.produced(), 2);
    }

    #[tokio::test]
    async fn test_discarding_only_counts() {
        let sink = MemorySink::discarding();
        let handle = sink.handle();

        sink.produce(b"k", b"v", None).await;

        assert_eq!(handle.produced(), 1);
        assert!(handle.records().is_empty());
    }

    #[tokio::test]
    async fn test_failing_close() {
        let sink = MemorySink::new().failing_close();
        let handle = sink.handle();

        assert!(matches!(sink.close().await, Err(SinkError::Close(_))));
        assert_eq!(handle.close_count(), 1);
    }
}

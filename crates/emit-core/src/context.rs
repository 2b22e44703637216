//! Run-wide generation counters shared by every emitter.

use crate::stats::GenerationStats;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Shared state of a run: when it started and how much it generated.
///
/// Counters are lock-free so emitters can update them from any task. The
/// locale is not stored here; it is passed into every render call.
#[derive(Debug)]
pub struct GenerationContext {
    started_at: DateTime<Utc>,
    start: Instant,
    generated_objects: AtomicU64,
    generated_bytes: AtomicU64,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            start: Instant::now(),
            generated_objects: AtomicU64::new(0),
            generated_bytes: AtomicU64::new(0),
        }
    }

    /// Wall-clock start of the run.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Account for one emitted record whose value was `value_len` bytes.
    pub fn record(&self, value_len: usize) {
        self.generated_objects.fetch_add(1, Ordering::Relaxed);
        self.generated_bytes
            .fetch_add(value_len as u64, Ordering::Relaxed);
    }

    pub fn generated_objects(&self) -> u64 {
        self.generated_objects.load(Ordering::Relaxed)
    }

    pub fn generated_bytes(&self) -> u64 {
        self.generated_bytes.load(Ordering::Relaxed)
    }

    /// Current counters and time elapsed since the run started.
    pub fn snapshot(&self) -> GenerationStats {
        GenerationStats {
            elapsed: self.start.elapsed(),
            objects: self.generated_objects(),
            bytes: self.generated_bytes(),
        }
    }
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_counts_objects_and_bytes() {
        let context = GenerationContext::new();
        context.record(10);
        context.record(0);
        context.record(5);
        assert_eq!(context.generated_objects(), 3);
        assert_eq!(context.generated_bytes(), 15);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let context = Arc::new(GenerationContext::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let context = Arc::clone(&context);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        context.record(3);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = context.snapshot();
        assert_eq!(stats.objects, 8000);
        assert_eq!(stats.bytes, 24000);
    }
}

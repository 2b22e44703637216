//! End-of-run statistics report.

use std::fmt;
use std::io::Write;
use std::time::Duration;

/// Below this elapsed time the throughput line is left out.
const MIN_THROUGHPUT_ELAPSED: Duration = Duration::from_millis(1);

/// Counters captured once every emitter has stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub elapsed: Duration,
    pub objects: u64,
    pub bytes: u64,
}

impl GenerationStats {
    /// Elapsed time rounded to whole seconds.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.as_secs_f64().round() as u64
    }

    /// Bytes per second, or `None` when the run was too short to measure.
    pub fn throughput(&self) -> Option<f64> {
        if self.elapsed < MIN_THROUGHPUT_ELAPSED {
            None
        } else {
            Some(self.bytes as f64 / self.elapsed.as_secs_f64())
        }
    }

    /// Write the report, framed by blank lines.
    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out)?;
        write!(out, "{self}")?;
        writeln!(out)?;
        out.flush()
    }
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Elapsed time: {}s", self.elapsed_secs())?;
        writeln!(f, "Data Generated (Objects): {}", self.objects)?;
        writeln!(f, "Data Generated (bytes): {}", self.bytes)?;
        if let Some(throughput) = self.throughput() {
            writeln!(f, "Throughput (bytes per second): {throughput:9.0}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lines() {
        let stats = GenerationStats {
            elapsed: Duration::from_millis(2600),
            objects: 120,
            bytes: 5200,
        };
        let mut out = Vec::new();
        stats.write_report(&mut out).unwrap();

        let report = String::from_utf8(out).unwrap();
        assert_eq!(
            report,
            "\nElapsed time: 3s\n\
             Data Generated (Objects): 120\n\
             Data Generated (bytes): 5200\n\
             Throughput (bytes per second):      2000\n\n"
        );
    }

    #[test]
    fn test_zero_elapsed_skips_throughput() {
        let stats = GenerationStats {
            elapsed: Duration::ZERO,
            objects: 5,
            bytes: 50,
        };
        assert_eq!(stats.throughput(), None);

        let report = stats.to_string();
        assert!(report.contains("Data Generated (Objects): 5"));
        assert!(report.contains("Data Generated (bytes): 50"));
        assert!(!report.contains("Throughput"));
    }

    #[test]
    fn test_elapsed_rounding() {
        let mut stats = GenerationStats {
            elapsed: Duration::from_millis(1499),
            objects: 0,
            bytes: 0,
        };
        assert_eq!(stats.elapsed_secs(), 1);
        stats.elapsed = Duration::from_millis(1500);
        assert_eq!(stats.elapsed_secs(), 2);
    }
}

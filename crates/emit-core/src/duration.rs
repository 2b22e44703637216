//! Duration parsing for emitter frequencies, lifetimes and TTLs.

use anyhow::Context;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Parse a duration string like "250ms", "30s", "5m", "1h" or "300".
///
/// Supports:
/// - Plain numbers (interpreted as seconds): "300"
/// - Milliseconds suffix: "250ms"
/// - Seconds suffix: "300s"
/// - Minutes suffix: "30m"
/// - Hours suffix: "1h"
///
/// Values may be negative. Zero and negative values yield `None`, which
/// callers read as "disabled": run once for a frequency, run forever for a
/// lifetime, no expiry for a TTL.
pub fn parse_duration(s: &str) -> anyhow::Result<Option<Duration>> {
    let millis = parse_duration_to_millis(s)?;
    Ok((millis > 0).then(|| Duration::from_millis(millis as u64)))
}

/// Parse a duration string into signed milliseconds.
pub fn parse_duration_to_millis(s: &str) -> anyhow::Result<i64> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    // Check for suffix, "ms" before "m" and "s"
    if let Some(num_str) = s.strip_suffix("ms") {
        return scaled(num_str, 1, "milliseconds");
    }
    if let Some(num_str) = s.strip_suffix('h') {
        return scaled(num_str, 3_600_000, "hours");
    }
    if let Some(num_str) = s.strip_suffix('m') {
        return scaled(num_str, 60_000, "minutes");
    }
    if let Some(num_str) = s.strip_suffix('s') {
        return scaled(num_str, 1000, "seconds");
    }

    // No suffix - treat as seconds
    scaled(s, 1000, "duration")
}

fn scaled(num_str: &str, millis_per_unit: i64, unit: &str) -> anyhow::Result<i64> {
    let value: i64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid {unit} value: {num_str}"))?;
    value
        .checked_mul(millis_per_unit)
        .with_context(|| format!("Duration out of range: {num_str} {unit}"))
}

/// Render an optional duration the way it is written in configuration.
pub fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        None => "0".to_string(),
        Some(d) if d.subsec_millis() != 0 => format!("{}ms", d.as_millis()),
        Some(d) => format!("{}s", d.as_secs()),
    }
}

/// Serde adapter for `Option<Duration>` fields written as duration strings
/// or plain integers (seconds).
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(secs) => Ok((secs > 0).then(|| Duration::from_secs(secs as u64))),
        Raw::Text(text) => parse_duration(&text).map_err(|e| serde::de::Error::custom(format!("{e:#}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        assert_eq!(parse_duration("250ms").unwrap(), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("30s").unwrap(), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("5m").unwrap(), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("1h").unwrap(), Some(Duration::from_secs(3600)));
        assert_eq!(parse_duration(" 300 ").unwrap(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_zero_and_negative_are_disabled() {
        assert_eq!(parse_duration("0").unwrap(), None);
        assert_eq!(parse_duration("-1").unwrap(), None);
        assert_eq!(parse_duration("-500ms").unwrap(), None);
        assert_eq!(parse_duration_to_millis("-1").unwrap(), -1000);
    }

    #[test]
    fn test_invalid() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("1.5s").is_err());
        assert!(parse_duration("10x").is_err());
        assert!(parse_duration("9999999999999999h").is_err());
        assert!(parse_duration("-9999999999999999m").is_err());
        assert!(parse_duration("9223372036854775807").is_err());
        assert_eq!(
            parse_duration_to_millis("9223372036854775807ms").unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "0");
        assert_eq!(format_duration(Some(Duration::from_millis(1500))), "1500ms");
        assert_eq!(format_duration(Some(Duration::from_secs(60))), "60s");
    }

    #[test]
    fn test_deserialize_opt() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(deserialize_with = "deserialize_opt")]
            value: Option<Duration>,
        }

        let parsed: Holder = serde_yaml::from_str("value: 100ms").unwrap();
        assert_eq!(parsed.value, Some(Duration::from_millis(100)));
        let parsed: Holder = serde_yaml::from_str("value: -1").unwrap();
        assert_eq!(parsed.value, None);
        let parsed: Holder = serde_yaml::from_str("value: 2").unwrap();
        assert_eq!(parsed.value, Some(Duration::from_secs(2)));
        assert!(serde_yaml::from_str::<Holder>("value: soon").is_err());
    }
}

//! Redis sink for datagen.
//!
//! Stores each record as a string key with an expiry (`SET key value EX ttl`)
//! over a multiplexed async connection.

use async_trait::async_trait;
use emit_core::duration::deserialize_opt;
use emit_core::{OutputHint, Sink, SinkError};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum RedisSinkError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl From<RedisSinkError> for SinkError {
    fn from(err: RedisSinkError) -> Self {
        SinkError::Connection(err.to_string())
    }
}

/// The `global.redis` configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisSettings {
    #[serde(default = "default_url")]
    pub url: String,

    /// Key expiry; zero or negative keeps keys forever.
    #[serde(default = "default_ttl", deserialize_with = "deserialize_opt")]
    pub ttl: Option<Duration>,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_ttl() -> Option<Duration> {
    Some(DEFAULT_TTL)
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            ttl: default_ttl(),
        }
    }
}

pub struct RedisSink {
    connection: MultiplexedConnection,
    ttl: Option<Duration>,
}

impl RedisSink {
    pub async fn connect(settings: &RedisSettings) -> Result<Self, RedisSinkError> {
        let client = redis::Client::open(settings.url.as_str())?;
        let connection = client.get_multiplexed_async_connection().await?;

        info!(
            "Redis sink connected (url={}, ttl={:?})",
            settings.url, settings.ttl
        );

        Ok(Self {
            connection,
            ttl: settings.ttl,
        })
    }
}

/// Expiry in whole seconds for one record, `None` for no expiry.
fn expiry_secs(default: Option<Duration>, hint: Option<&OutputHint>) -> Option<u64> {
    let ttl = match hint {
        Some(OutputHint::Ttl(ttl)) => Some(*ttl),
        _ => default,
    };
    // SET EX rejects 0, sub-second TTLs round up
    ttl.filter(|ttl| !ttl.is_zero())
        .map(|ttl| ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0))
}

#[async_trait]
impl Sink for RedisSink {
    async fn produce(&self, key: &[u8], value: &[u8], hint: Option<&OutputHint>) {
        let mut connection = self.connection.clone();
        let result: redis::RedisResult<()> = match expiry_secs(self.ttl, hint) {
            Some(seconds) => connection.set_ex(key, value, seconds).await,
            None => connection.set(key, value).await,
        };

        if let Err(e) = result {
            warn!(
                "Failed to store key '{}' in Redis: {}",
                String::from_utf8_lossy(key),
                e
            );
        }
    }

    async fn close(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings: RedisSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings.url, "redis://127.0.0.1:6379");
        assert_eq!(settings.ttl, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_settings_ttl_forms() {
        let settings: RedisSettings = serde_yaml::from_str("ttl: 5m").unwrap();
        assert_eq!(settings.ttl, Some(Duration::from_secs(300)));

        let settings: RedisSettings = serde_yaml::from_str("ttl: 0").unwrap();
        assert_eq!(settings.ttl, None);
    }

    #[test]
    fn test_expiry() {
        assert_eq!(expiry_secs(Some(DEFAULT_TTL), None), Some(60));
        assert_eq!(expiry_secs(None, None), None);
        assert_eq!(expiry_secs(Some(Duration::from_millis(1500)), None), Some(2));

        let hint = OutputHint::Ttl(Duration::from_secs(10));
        assert_eq!(expiry_secs(Some(DEFAULT_TTL), Some(&hint)), Some(10));

        let zero = OutputHint::Ttl(Duration::ZERO);
        assert_eq!(expiry_secs(Some(DEFAULT_TTL), Some(&zero)), None);

        let topic = OutputHint::Topic("t".to_string());
        assert_eq!(expiry_secs(Some(DEFAULT_TTL), Some(&topic)), Some(60));
    }
}

//! Producer settings, read from the `global.kafka` configuration section.

use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_BOOTSTRAP_SERVERS: &str = "localhost:9092";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KafkaSettings {
    #[serde(default = "default_bootstrap_servers")]
    pub bootstrap_servers: String,

    /// Extra librdkafka properties, applied after the defaults.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Create each emitter's topic when the sink is built.
    #[serde(default)]
    pub auto_create: bool,

    #[serde(default = "default_partitions")]
    pub partitions: i32,

    #[serde(default = "default_replication")]
    pub replication: i32,
}

fn default_bootstrap_servers() -> String {
    DEFAULT_BOOTSTRAP_SERVERS.to_string()
}

fn default_partitions() -> i32 {
    1
}

fn default_replication() -> i32 {
    1
}

impl Default for KafkaSettings {
    fn default() -> Self {
        Self {
            bootstrap_servers: default_bootstrap_servers(),
            properties: BTreeMap::new(),
            auto_create: false,
            partitions: default_partitions(),
            replication: default_replication(),
        }
    }
}

impl KafkaSettings {
    /// Producer properties: the defaults, then the user overrides.
    pub fn producer_properties(&self) -> BTreeMap<String, String> {
        let mut properties: BTreeMap<String, String> = [
            ("bootstrap.servers", self.bootstrap_servers.as_str()),
            ("message.timeout.ms", "30000"),
            ("queue.buffering.max.messages", "100000"),
            ("linger.ms", "5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        properties.extend(self.properties.clone());
        properties
    }
}

//! YAML configuration: global settings plus the list of emitters.
//!
//! ```yaml
//! global:
//!   template_dir: ${HOME}/.datagen/templates
//!   seed: 42
//!   kafka:
//!     bootstrap_servers: localhost:9092
//!   redis:
//!     ttl: 5m
//! emitters:
//!   - name: users
//!     embedded_template: '{"id": "{{uuid}}", "name": "{{name}}"}'
//!     frequency: 1s
//!     duration: 1m
//!     output: kafka
//!     topic: users
//! ```

use anyhow::Context;
use emit_core::runner::check_unique_names;
use emit_core::{EmitterDefinition, RunOptions};
use serde::Deserialize;
use sink_kafka::KafkaSettings;
use sink_mongodb::MongoSettings;
use sink_redis::RedisSettings;
use std::path::{Path, PathBuf};

pub const DEFAULT_TEMPLATE_DIR: &str = "$HOME/.datagen/templates";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Directory of `<name>.tpl` files; `$VAR` and `${VAR}` are expanded.
    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    /// Base seed; taken from the clock when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub kafka: KafkaSettings,

    #[serde(default)]
    pub redis: RedisSettings,

    #[serde(default)]
    pub mongodb: MongoSettings,
}

fn default_template_dir() -> String {
    DEFAULT_TEMPLATE_DIR.to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            seed: None,
            kafka: KafkaSettings::default(),
            redis: RedisSettings::default(),
            mongodb: MongoSettings::default(),
        }
    }
}

impl GlobalConfig {
    pub fn template_dir(&self) -> PathBuf {
        PathBuf::from(expand_env(&self.template_dir))
    }

    /// Options for a run selecting `only` (all emitters when empty).
    pub fn run_options(&self, seed: Option<u64>, only: Vec<String>) -> RunOptions {
        RunOptions {
            template_dir: self.template_dir(),
            seed: seed.or(self.seed).unwrap_or_else(clock_seed),
            only,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,

    #[serde(default)]
    pub emitters: Vec<EmitterDefinition>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).context("Failed to parse configuration")?;
        check_unique_names(&config.emitters)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn emitter(&self, name: &str) -> Option<&EmitterDefinition> {
        self.emitters.iter().find(|e| e.name == name)
    }
}

fn clock_seed() -> u64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64
}

/// Replace `$VAR` and `${VAR}` with environment values. Unset variables
/// expand to nothing.
pub fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let name: String = if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                name.push(c);
            }
            if !closed {
                out.push_str("${");
                out.push_str(&name);
                continue;
            }
            name
        } else {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                out.push('$');
                continue;
            }
            name
        };

        out.push_str(&std::env::var(&name).unwrap_or_default());
    }

    out
}

//! Configured, unresolved emitters.

use crate::duration;
use crate::error::InitError;
use crate::sink::console::{DEFAULT_OUTPUT_TEMPLATE, KCAT_OUTPUT_TEMPLATE};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Locale used when an emitter does not set one.
pub const DEFAULT_LOCALE: &str = "us";

/// One emitter as written in configuration.
///
/// ```yaml
/// name: shoes
/// locale: it
/// num: 10
/// frequency: 500ms
/// duration: 1m
/// preload: 100
/// key_template: "{{uuid}}"
/// value_template: shoe
/// output: kafka
/// topic: shoes
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitterDefinition {
    pub name: String,

    #[serde(default = "default_locale")]
    pub locale: String,

    /// Records generated per pass.
    #[serde(default = "default_num")]
    pub num: u64,

    /// Time between passes; unset, zero or negative means a single pass.
    #[serde(default, deserialize_with = "duration::deserialize_opt")]
    pub frequency: Option<Duration>,

    /// Lifetime of the emitter; unset or zero means until interrupted.
    #[serde(default, deserialize_with = "duration::deserialize_opt")]
    pub duration: Option<Duration>,

    /// Records sent once before scheduling starts.
    #[serde(default)]
    pub preload: u64,

    #[serde(default = "default_key_template")]
    pub key_template: String,

    /// Name of a template file, resolved as `<template_dir>/<name>.tpl`.
    #[serde(default)]
    pub value_template: Option<String>,

    /// Inline value template.
    #[serde(default)]
    pub embedded_template: Option<String>,

    /// Sink label.
    #[serde(default = "default_output")]
    pub output: String,

    /// Console output format.
    #[serde(default = "default_output_template")]
    pub output_template: String,

    /// Kafka topic.
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Strip line breaks from rendered values.
    #[serde(default)]
    pub oneline: bool,

    /// Shorthand for `oneline`, `stdout` and a `key,value` output format.
    #[serde(default)]
    pub kcat: bool,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_num() -> u64 {
    1
}

fn default_key_template() -> String {
    "key".to_string()
}

fn default_output() -> String {
    "stdout".to_string()
}

fn default_output_template() -> String {
    DEFAULT_OUTPUT_TEMPLATE.to_string()
}

fn default_topic() -> String {
    "test".to_string()
}

impl Default for EmitterDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            locale: default_locale(),
            num: default_num(),
            frequency: None,
            duration: None,
            preload: 0,
            key_template: default_key_template(),
            value_template: None,
            embedded_template: None,
            output: default_output(),
            output_template: default_output_template(),
            topic: default_topic(),
            oneline: false,
            kcat: false,
        }
    }
}

impl EmitterDefinition {
    /// The definition with shorthands expanded.
    pub fn normalized(&self) -> Self {
        let mut definition = self.clone();
        if definition.kcat {
            definition.oneline = true;
            definition.output = "stdout".to_string();
            definition.output_template = KCAT_OUTPUT_TEMPLATE.to_string();
        }
        definition
    }

    pub fn validate(&self) -> Result<(), InitError> {
        let invalid = |reason: &str| InitError::InvalidDefinition {
            emitter: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.num == 0 {
            return Err(invalid("num must be at least 1"));
        }
        match (&self.value_template, &self.embedded_template) {
            (Some(_), Some(_)) => Err(invalid(
                "value_template and embedded_template are mutually exclusive",
            )),
            (None, None) => Err(invalid(
                "one of value_template or embedded_template is required",
            )),
            _ => Ok(()),
        }
    }

    /// Source of the value template, reading it from `template_dir` when the
    /// definition names a template file.
    pub fn value_source(&self, template_dir: &Path) -> Result<String, InitError> {
        if let Some(source) = &self.embedded_template {
            return Ok(source.clone());
        }

        let name = self
            .value_template
            .as_deref()
            .ok_or_else(|| InitError::InvalidDefinition {
                emitter: self.name.clone(),
                reason: "no value template".to_string(),
            })?;

        let path = template_dir.join(format!("{name}.tpl"));
        std::fs::read_to_string(&path).map_err(|source| InitError::TemplateRead {
            emitter: self.name.clone(),
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_defaults() {
        let definition: EmitterDefinition = serde_yaml::from_str(
            r#"
name: users
embedded_template: "{{uuid}}"
"#,
        )
        .unwrap();

        assert_eq!(definition.locale, "us");
        assert_eq!(definition.num, 1);
        assert_eq!(definition.frequency, None);
        assert_eq!(definition.duration, None);
        assert_eq!(definition.preload, 0);
        assert_eq!(definition.key_template, "key");
        assert_eq!(definition.output, "stdout");
        assert_eq!(definition.output_template, "{{value}}\n");
        assert_eq!(definition.topic, "test");
        assert!(definition.validate().is_ok());
    }

    #[test]
    fn test_yaml_full() {
        let definition: EmitterDefinition = serde_yaml::from_str(
            r#"
name: shoes
locale: it
num: 10
frequency: 500ms
duration: 1m
preload: 100
key_template: "{{uuid}}"
value_template: shoe
output: kafka
topic: shoes
oneline: true
"#,
        )
        .unwrap();

        assert_eq!(definition.num, 10);
        assert_eq!(definition.frequency, Some(Duration::from_millis(500)));
        assert_eq!(definition.duration, Some(Duration::from_secs(60)));
        assert_eq!(definition.preload, 100);
        assert_eq!(definition.value_template.as_deref(), Some("shoe"));
        assert!(definition.oneline);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_yaml::from_str::<EmitterDefinition>("name: x\nfrequncy: 1s\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_kcat_normalization() {
        let definition = EmitterDefinition {
            name: "k".to_string(),
            output: "kafka".to_string(),
            kcat: true,
            embedded_template: Some("v".to_string()),
            ..Default::default()
        };

        let normalized = definition.normalized();
        assert!(normalized.oneline);
        assert_eq!(normalized.output, "stdout");
        assert_eq!(normalized.output_template, "{{key}},{{value}}\n");
    }

    #[test]
    fn test_validation() {
        let base = EmitterDefinition {
            name: "v".to_string(),
            embedded_template: Some("v".to_string()),
            ..Default::default()
        };
        assert!(base.validate().is_ok());

        let zero = EmitterDefinition { num: 0, ..base.clone() };
        assert!(zero.validate().is_err());

        let both = EmitterDefinition {
            value_template: Some("file".to_string()),
            ..base.clone()
        };
        assert!(both.validate().is_err());

        let neither = EmitterDefinition {
            embedded_template: None,
            ..base.clone()
        };
        assert!(neither.validate().is_err());

        let unnamed = EmitterDefinition {
            name: " ".to_string(),
            ..base
        };
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_value_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("user.tpl"), "{{name}} {{surname}}").unwrap();

        let definition = EmitterDefinition {
            name: "users".to_string(),
            value_template: Some("user".to_string()),
            ..Default::default()
        };
        assert_eq!(
            definition.value_source(dir.path()).unwrap(),
            "{{name}} {{surname}}"
        );

        let missing = EmitterDefinition {
            value_template: Some("nope".to_string()),
            ..definition
        };
        assert!(matches!(
            missing.value_source(dir.path()),
            Err(InitError::TemplateRead { .. })
        ));
    }
}

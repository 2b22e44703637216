//! Flags describing a single ad-hoc emitter.

use anyhow::Context;
use clap::Args;
use emit_core::duration::parse_duration;
use emit_core::sink::console::DEFAULT_OUTPUT_TEMPLATE;
use emit_core::{EmitterDefinition, DEFAULT_LOCALE};

#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// Name of a template in the template directory
    #[arg(required_unless_present = "embedded", conflicts_with = "embedded")]
    pub template: Option<String>,

    /// Inline value template
    #[arg(long)]
    pub embedded: Option<String>,

    /// Records generated per pass
    #[arg(short = 'n', long, default_value_t = 1)]
    pub num: u64,

    /// Time between passes (e.g. 500ms, 1s); 0 runs a single pass
    #[arg(short = 'f', long, default_value = "0")]
    pub frequency: String,

    /// Lifetime of the emitter; 0 runs until interrupted
    #[arg(short = 'd', long, default_value = "0")]
    pub duration: String,

    /// Key template
    #[arg(long, default_value = "key")]
    pub key: String,

    /// Output (stdout, kafka, redis, mongo)
    #[arg(short = 'o', long, default_value = "stdout")]
    pub output: String,

    /// Kafka topic
    #[arg(short = 't', long, default_value = "test")]
    pub topic: String,

    /// Console output format
    #[arg(long, default_value = DEFAULT_OUTPUT_TEMPLATE)]
    pub output_template: String,

    /// Strip line breaks from values
    #[arg(short = 'l', long)]
    pub oneline: bool,

    /// Print key,value lines suited for kcat
    #[arg(long)]
    pub kcat: bool,

    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub locale: String,

    /// Records sent once before the first pass
    #[arg(long, default_value_t = 0)]
    pub preload: u64,
}

impl ExecArgs {
    pub fn to_definition(&self) -> anyhow::Result<EmitterDefinition> {
        let frequency = parse_duration(&self.frequency)
            .with_context(|| format!("Invalid frequency '{}'", self.frequency))?;
        let duration = parse_duration(&self.duration)
            .with_context(|| format!("Invalid duration '{}'", self.duration))?;

        Ok(EmitterDefinition {
            name: self.template.clone().unwrap_or_else(|| "exec".to_string()),
            locale: self.locale.clone(),
            num: self.num,
            frequency,
            duration,
            preload: self.preload,
            key_template: self.key.clone(),
            value_template: self.template.clone(),
            embedded_template: self.embedded.clone(),
            output: self.output.clone(),
            output_template: self.output_template.clone(),
            topic: self.topic.clone(),
            oneline: self.oneline,
            kcat: self.kcat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        exec: ExecArgs,
    }

    fn parse(args: &[&str]) -> Result<ExecArgs, clap::Error> {
        TestCli::try_parse_from(std::iter::once("exec").chain(args.iter().copied())).map(|c| c.exec)
    }

    #[test]
    fn test_defaults_match_definition_defaults() {
        let args = parse(&["--embedded", "{{uuid}}"]).unwrap();
        let definition = args.to_definition().unwrap();

        assert_eq!(
            definition,
            EmitterDefinition {
                name: "exec".to_string(),
                embedded_template: Some("{{uuid}}".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "user", "-n", "3", "-f", "250ms", "-d", "1m", "-o", "kafka", "-t", "users", "--kcat",
        ])
        .unwrap();
        let definition = args.to_definition().unwrap();

        assert_eq!(definition.name, "user");
        assert_eq!(definition.value_template.as_deref(), Some("user"));
        assert_eq!(definition.num, 3);
        assert_eq!(definition.frequency, Some(Duration::from_millis(250)));
        assert_eq!(definition.duration, Some(Duration::from_secs(60)));
        assert_eq!(definition.topic, "users");
        assert!(definition.kcat);
    }

    #[test]
    fn test_template_source_required() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["user", "--embedded", "x"]).is_err());
    }

    #[test]
    fn test_bad_frequency() {
        let args = parse(&["--embedded", "x", "-f", "soon"]).unwrap();
        assert!(args.to_definition().is_err());
    }
}

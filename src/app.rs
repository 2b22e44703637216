//! What the `datagen` subcommands do, independent of argument parsing.

use crate::config::{Config, GlobalConfig};
use crate::sinks::registry_for;
use emit_core::{EmitterDefinition, RunOptions, RunSummary};
use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run `definitions` to completion and return the run summary.
pub async fn generate(
    global: &GlobalConfig,
    definitions: &[EmitterDefinition],
    options: &RunOptions,
    dry_run: bool,
    cancel: CancellationToken,
) -> anyhow::Result<RunSummary> {
    info!(
        "Generating with seed {} from {} emitter definitions{}",
        options.seed,
        definitions.len(),
        if dry_run { " (dry run)" } else { "" }
    );

    let registry = registry_for(global, dry_run);
    let summary = emit_core::run(definitions, options, &registry, cancel).await?;

    for task in &summary.tasks {
        info!(
            "Emitter '{}': {} records in {} passes ({:?})",
            task.name, task.records, task.passes, task.stop
        );
    }
    Ok(summary)
}

/// Print one line per configured emitter.
pub fn list<W: Write>(config: &Config, out: &mut W) -> std::io::Result<()> {
    if config.emitters.is_empty() {
        writeln!(out, "No emitters configured")?;
        return Ok(());
    }

    for emitter in &config.emitters {
        let source = match (&emitter.value_template, &emitter.embedded_template) {
            (Some(name), _) => format!("template={name}"),
            (None, Some(_)) => "template=<embedded>".to_string(),
            (None, None) => "template=<none>".to_string(),
        };
        writeln!(
            out,
            "{}\toutput={}\tnum={}\tfrequency={}\tduration={}\t{}",
            emitter.name,
            emitter.output,
            emitter.num,
            emit_core::duration::format_duration(emitter.frequency),
            emit_core::duration::format_duration(emitter.duration),
            source
        )?;
    }
    Ok(())
}

/// Cancel `cancel` when the process receives Ctrl+C.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping emitters");
            cancel.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list() {
        let config = Config::from_yaml(
            r#"
emitters:
  - name: users
    value_template: user
    frequency: 500ms
    output: kafka
  - name: inline
    embedded_template: x
"#,
        )
        .unwrap();

        let mut out = Vec::new();
        list(&config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "users\toutput=kafka\tnum=1\tfrequency=500ms\tduration=0\ttemplate=user"
        );
        assert_eq!(
            lines[1],
            "inline\toutput=stdout\tnum=1\tfrequency=0\tduration=0\ttemplate=<embedded>"
        );
    }

    #[test]
    fn test_list_empty() {
        let mut out = Vec::new();
        list(&Config::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No emitters configured\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dry_run_counts_every_record() {
        let config = Config::from_yaml(
            r#"
emitters:
  - name: kafka-bound
    embedded_template: "0123456789"
    num: 4
    output: kafka
  - name: redis-bound
    embedded_template: "abc"
    frequency: 100ms
    duration: 250ms
    output: redis
"#,
        )
        .unwrap();
        let options = config.global.run_options(Some(1), Vec::new());

        let summary = generate(
            &config.global,
            &config.emitters,
            &options,
            true,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        // 4 records of 10 bytes, then 2 passes of 3 bytes
        assert_eq!(summary.stats.objects, 6);
        assert_eq!(summary.stats.bytes, 46);
        assert_eq!(summary.tasks.len(), 2);
    }
}

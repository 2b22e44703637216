//! Command-line interface for datagen
//!
//! # Usage Examples
//!
//! ```bash
//! # All emitters from a configuration file
//! datagen run --config datagen.yaml
//!
//! # Selected emitters with a fixed seed
//! datagen run --config datagen.yaml --emitter users --emitter orders --seed 42
//!
//! # Single emitter from flags, printed for kcat
//! datagen exec user -n 5 -f 500ms -d 10s --kcat
//!
//! # What a configuration file defines
//! datagen list --config datagen.yaml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use datagen::app::{cancel_on_ctrl_c, generate, list};
use datagen::{Config, ExecArgs, GlobalConfig};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "datagen")]
#[command(about = "Generate random streaming data into Kafka, Redis, MongoDB or the console")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the emitters of a configuration file
    Run {
        /// Configuration file
        #[arg(short, long, env = "DATAGEN_CONFIG", default_value = "datagen.yaml")]
        config: PathBuf,

        /// Only run this emitter (repeatable)
        #[arg(short, long = "emitter", value_name = "NAME")]
        emitters: Vec<String>,

        /// Base seed, overriding the configured one
        #[arg(long)]
        seed: Option<u64>,

        /// Count records instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a single emitter described by flags
    Exec {
        /// Configuration file for backend settings
        #[arg(short, long, env = "DATAGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Directory of template files, overriding the configured one
        #[arg(long)]
        template_dir: Option<String>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        emitter: ExecArgs,
    },

    /// List the emitters of a configuration file
    List {
        #[arg(short, long, env = "DATAGEN_CONFIG", default_value = "datagen.yaml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            emitters,
            seed,
            dry_run,
        } => {
            let config = Config::from_file(&config)?;
            let options = config.global.run_options(seed, emitters);
            let cancel = CancellationToken::new();
            cancel_on_ctrl_c(cancel.clone());

            let summary = generate(&config.global, &config.emitters, &options, dry_run, cancel).await?;
            summary
                .stats
                .write_report(&mut std::io::stderr())
                .context("Failed to write statistics")?;
        }
        Commands::Exec {
            config,
            template_dir,
            seed,
            dry_run,
            emitter,
        } => {
            let mut global = match config {
                Some(path) => Config::from_file(&path)?.global,
                None => GlobalConfig::default(),
            };
            if let Some(dir) = template_dir {
                global.template_dir = dir;
            }

            let definition = emitter.to_definition()?;
            let options = global.run_options(seed, Vec::new());
            let cancel = CancellationToken::new();
            cancel_on_ctrl_c(cancel.clone());

            let summary = generate(&global, &[definition], &options, dry_run, cancel).await?;
            summary
                .stats
                .write_report(&mut std::io::stderr())
                .context("Failed to write statistics")?;
        }
        Commands::List { config } => {
            let config = Config::from_file(&config)?;
            list(&config, &mut std::io::stdout()).context("Failed to list emitters")?;
        }
    }

    Ok(())
}

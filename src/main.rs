use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use cs2_flattener::config::{NotifierKind, Settings};
use cs2_flattener::domain::MatchDocument;
use cs2_flattener::infra::{build_notifier, FsMatchSource, FsRecordStore};
use cs2_flattener::pipeline::{flatten, MatchPipeline, PipelineOptions};
use cs2_flattener::{logging, metrics};

#[derive(Parser)]
#[command(name = "cs2_flattener")]
#[command(about = "Flattens raw CS2 games into per-round player/opponent records")]
#[command(version = "0.1.0")]
struct Cli {
    /// dotenv file with settings (ignored when missing)
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    /// Optional TOML settings file, applied before the env file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten every raw game and announce each written one
    Run {
        /// Overwrite games whose output already exists
        #[arg(long)]
        force: bool,
        /// Skip all notifications
        #[arg(long)]
        no_notify: bool,
    },
    /// Validate and flatten one raw game, printing records to stdout
    Flatten {
        file: PathBuf,
    },
}

async fn run(mut settings: Settings, force: bool, no_notify: bool) -> anyhow::Result<()> {
    if no_notify {
        settings.notifier = NotifierKind::None;
    }
    let prometheus = metrics::init_recorder();

    let pipeline = MatchPipeline::new(
        Box::new(FsMatchSource::new(&settings.games_raw_dir)),
        Box::new(FsRecordStore::new(&settings.games_flatten_dir)),
        build_notifier(&settings)?,
        PipelineOptions {
            force,
            rules: settings.validation_rules(),
        },
    );

    let summary = pipeline.run().await.map_err(|e| {
        error!("Batch aborted: {}", e);
        e
    })?;
    println!("\n{}", summary);
    info!("✅ Parsed {} games.", summary.succeeded());

    if let (Some(handle), Some(url)) = (prometheus.as_ref(), settings.pushgateway_url.as_deref()) {
        metrics::push_to_gateway(handle, url, "batch").await;
    }
    Ok(())
}

fn flatten_one(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let source_key = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let document = MatchDocument::parse(source_key, &bytes, &settings.validation_rules())?;
    let records = flatten(&document);
    eprintln!("Flattened {} into {} records", document.key(), records.len());
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(&cli.env_file, cli.config.as_deref())
        .context("loading settings")?;
    let _guard = logging::init_logging(settings.app_log_level, &settings.app_log_dir);

    match cli.command {
        Commands::Run { force, no_notify } => run(settings, force, no_notify).await,
        Commands::Flatten { file } => flatten_one(&settings, &file),
    }
}

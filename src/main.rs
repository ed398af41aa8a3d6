//! Dance Analysis - pose and motion event counts from landmark videos

use anyhow::Context;
use dance_analysis_lib::cli::{Cli, Commands, ConfigAction};
use dance_analysis_lib::{
    AnalysisConfig, AnalysisOutcome, AnalysisService, LandmarkBridge, LandmarkFileBridge,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so --verbose can pick the log level
    let cli = Cli::parse_args();

    // Logs go to stderr; stdout carries only JSON results
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            videos,
            overrides,
            pretty,
            timeout_secs,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let failed = run_analyze(config, &videos, &overrides, pretty, timeout_secs).await?;
            if failed > 0 {
                anyhow::bail!("{} of {} videos failed", failed, videos.len());
            }
        }
        Commands::Config { action } => run_config(action, cli.config.as_deref())?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    AnalysisConfig::load_or_default(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {:?}", path),
        None => "Failed to load default config".to_string(),
    })
}

/// Analyze every video and print one JSON line per outcome. Returns the
/// number of failed videos.
async fn run_analyze(
    mut config: AnalysisConfig,
    videos: &[String],
    overrides: &[(String, String)],
    pretty: bool,
    timeout_secs: Option<u64>,
) -> anyhow::Result<usize> {
    for (name, value) in overrides {
        config
            .apply_override(name, value)
            .with_context(|| format!("Invalid --set {}={}", name, value))?;
    }

    let bridge: Arc<dyn LandmarkBridge> = Arc::new(LandmarkFileBridge::new(&config.source));
    info!("Analyzing {} videos via {}", videos.len(), bridge.get_bridge_info());

    let service = AnalysisService::new(bridge, config);
    let deadline = timeout_secs.map(Duration::from_secs);
    let outcomes = service.analyze_many(videos, deadline).await;

    let mut failed = 0;
    for outcome in &outcomes {
        if let AnalysisOutcome::Error(err) = outcome {
            warn!("{}", err.error);
            failed += 1;
        }
        let line = if pretty {
            serde_json::to_string_pretty(outcome)?
        } else {
            serde_json::to_string(outcome)?
        };
        println!("{}", line);
    }

    Ok(failed)
}

fn run_config(action: ConfigAction, config_path: Option<&Path>) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Validate { path } => {
            AnalysisConfig::load(&path)
                .with_context(|| format!("Invalid config {:?}", path))?;
            println!("Config {:?} is valid", path);
        }
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("Config already exists at {:?}. Use --force to overwrite.", path);
            }
            AnalysisConfig::default().save(&path)?;
            println!("Created config at {:?}", path);
        }
    }

    Ok(())
}

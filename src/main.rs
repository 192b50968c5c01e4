//! Helpdesk call - main entry point

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use helpdesk_call::testconfig::TestConfig;
use helpdesk_call::ui::{HelpdeskApp, APP_TITLE};
use helpdesk_call::config::ConfigSource;
use helpdesk_call::{load_config, CallController, HttpTokenSource, SimulatedSession};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "helpdesk-call", version, about = "Talk to the AI IT helpdesk")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Token endpoint base URL, overrides config and HELPDESK_API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// Run a scripted UI scenario and exit with its result
    #[arg(long)]
    test_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) = load_config(cli.config.as_deref(), cli.api_url.as_deref())
        .context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting helpdesk call client");
    match &source {
        ConfigSource::File(path) => tracing::info!(path = %path.display(), "config loaded"),
        ConfigSource::Missing(path) => {
            tracing::info!(path = %path.display(), "config file not found, using defaults")
        }
        ConfigSource::Defaults => tracing::info!("no config directory, using defaults"),
    }
    tracing::info!("Token endpoint: {}", config.token_endpoint());

    let test_config = cli
        .test_config
        .map(TestConfig::load)
        .transpose()
        .context("failed to load test scenario")?;

    // Lives for the whole process; the controller spawns token requests onto it
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    let session = SimulatedSession::from_secs(config.session.simulated_call_secs);
    let tokens = Arc::new(HttpTokenSource::new(&config.api.base_url));
    let controller = CallController::new(
        tokens,
        Arc::new(session.clone()),
        runtime.handle().clone(),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 420.0])
            .with_min_inner_size([360.0, 320.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            Ok(Box::new(HelpdeskApp::new(
                cc,
                controller,
                Some(session),
                test_config,
            )))
        }),
    )
    .map_err(|e| anyhow!("UI error: {}", e))?;

    Ok(())
}

//! plant-scan - identify a plant from a photo
//!
//! One-shot mode scans the image given on the command line; without an
//! image an interactive console is started.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plant_scan::capture::{ImageAcquirer, PathPicker};
use plant_scan::config::{self, AppConfig};
use plant_scan::dashboard::console::{run_console, spawn_stdin_reader};
use plant_scan::dashboard::{render, RenderOptions};
use plant_scan::overlay::ConsoleNotifier;
use plant_scan::vision::{ClassificationOptions, IdentificationPipeline, PlantIdClient};
use plant_scan::ScanSession;

/// plant-scan - photo to plant species identification
#[derive(Parser, Debug)]
#[command(name = "plant-scan")]
#[command(about = "Identify a plant species from a photo")]
struct Args {
    /// Image to identify (omit for the interactive console)
    image: Option<PathBuf>,

    /// Configuration file (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the classification endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Do not ask the service for similar images
    #[arg(long)]
    no_similar_images: bool,

    /// Disable colored notifications
    #[arg(long)]
    no_color: bool,

    /// Write the default configuration file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path().unwrap_or_else(|_| PathBuf::from("config.toml")),
    };

    if args.init_config {
        config::save_config(&AppConfig::default(), &config_path)
            .with_context(|| format!("Failed to write {:?}", config_path))?;
        println!("Wrote default configuration to {}", config_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let (mut config, loaded) = load_or_default_config(&config_path);

    // Initialize logging
    let level = if args.verbose { "debug" } else { config.logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match loaded {
        Ok(()) => info!("Loaded configuration from {:?}", config_path),
        Err(e) => info!("Using default configuration ({:#})", e),
    }

    if let Some(endpoint) = args.endpoint {
        config.service.endpoint = endpoint;
    }
    if args.no_similar_images {
        config.service.similar_images = false;
    }
    if args.no_color {
        config.display.color = false;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run(args.image, config))
}

/// Load configuration from file, falling back to defaults
fn load_or_default_config(path: &std::path::Path) -> (AppConfig, Result<()>) {
    if !path.exists() {
        return (AppConfig::default(), Err(anyhow::anyhow!("{:?} not found", path)));
    }
    match config::load_config(path) {
        Ok(config) => (config, Ok(())),
        Err(e) => (AppConfig::default(), Err(e)),
    }
}

async fn run(image: Option<PathBuf>, config: AppConfig) -> Result<ExitCode> {
    info!("Classification endpoint: {}", config.service.endpoint);

    let client = PlantIdClient::new(config.service.endpoint.clone(), config.service.api_key());
    let pipeline = IdentificationPipeline::with_options(
        Box::new(client),
        ClassificationOptions {
            similar_images: config.service.similar_images,
        },
    );
    let options = RenderOptions {
        show_description: config.display.show_description,
        probe_preview: config.display.probe_preview,
    };
    let mut notifier = ConsoleNotifier::stderr(config.display.color);
    let mut session = ScanSession::new();

    match image {
        Some(path) => {
            let mut acquirer = ImageAcquirer::new(PathPicker::new(path));
            session.scan(&mut acquirer, &pipeline, &mut notifier).await;
            println!("{}", render(&session, &options));

            if session.state().failure().is_some() {
                return Ok(ExitCode::FAILURE);
            }
        }
        None => {
            let lines = spawn_stdin_reader();
            run_console(&mut session, &pipeline, &mut notifier, &options, lines).await;
        }
    }

    info!("plant-scan exiting");
    Ok(ExitCode::SUCCESS)
}

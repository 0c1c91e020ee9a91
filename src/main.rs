use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lungscan::preprocessing::is_supported_image;
use lungscan::{AppConfig, EnsemblePipeline, Error, report};

#[derive(Parser)]
#[command(name = "lungscan")]
#[command(about = "Classify chest CT scans with a two-model ensemble")]
struct Cli {
    /// Path to input image file (png, jpg, jpeg). Starts the GUI when omitted.
    #[arg(value_name = "IMAGE")]
    image_path: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./lungscan.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// ResNet50 model file
    #[arg(long, value_name = "FILE")]
    resnet_model: Option<PathBuf>,

    /// DenseNet201 model file
    #[arg(long, value_name = "FILE")]
    densenet_model: Option<PathBuf>,

    /// Allow an accelerator if the runtime has one
    #[arg(long)]
    allow_accelerator: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = args.resnet_model {
        config.models.resnet.path = path;
    }
    if let Some(path) = args.densenet_model {
        config.models.densenet.path = path;
    }
    if args.allow_accelerator {
        config.runtime.force_cpu = false;
    }
    config.validate()?;

    let pipeline = EnsemblePipeline::load(&config).context("Failed to load models")?;

    match args.image_path {
        Some(path) => classify(&pipeline, path),
        None => run_gui(pipeline),
    }
}

fn classify(pipeline: &EnsemblePipeline, path: PathBuf) -> anyhow::Result<()> {
    if !is_supported_image(&path) {
        return Err(Error::UnsupportedFormat { path }.into());
    }
    let classification = pipeline
        .classify_file(&path)
        .with_context(|| format!("Failed to predict {}", path.display()))?;
    print!(
        "{}",
        report::render_text(&classification.info, &classification.result)
    );
    Ok(())
}

#[cfg(feature = "gui")]
fn run_gui(pipeline: EnsemblePipeline) -> anyhow::Result<()> {
    lungscan::gui::run(pipeline).map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

#[cfg(not(feature = "gui"))]
fn run_gui(_pipeline: EnsemblePipeline) -> anyhow::Result<()> {
    anyhow::bail!("No image given and lungscan was built without the gui feature")
}

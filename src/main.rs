use anyhow::Context;
use clap::Parser;
use photo_autocrop::cli::Args;
use photo_autocrop::{config::Config, engines, pipeline, raster, RunSummary};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let args = Args::parse();

    // Progress goes to stdout, warnings and errors to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false)
                .with_level(false)
                .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout)),
        )
        .init();

    let config = Config::from(args);

    match run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<RunSummary> {
    config.validate()?;

    // The page source checks its own dependency before rendering the first page
    let source = raster::for_config(config);
    let recognizer = engines::create(config)?;
    tracing::debug!(
        "Using {} engine: {}",
        recognizer.name(),
        recognizer.description()
    );

    let summary = pipeline::run(config, recognizer.as_ref(), source.as_ref())
        .with_context(|| format!("Failed to process {:?}", config.input))?;

    Ok(summary)
}

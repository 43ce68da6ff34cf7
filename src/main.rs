use anyhow::Context;
use clap::Parser;
use comparendos::cli::Args;
use comparendos::config::Config;
use comparendos::logging::setup_logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config and setup logging first so lookup logs are never silently dropped
    let config = match Config::load().context("Failed to load config") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        headless = config.headless,
        "starting comparendos"
    );

    let result = comparendos::get_with_config(&config, &args.plate).await;

    let rendered = if args.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    };
    match rendered.context("Failed to serialize result") {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = ?e, "could not render result");
            return ExitCode::FAILURE;
        }
    }

    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

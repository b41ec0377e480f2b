use std::process::ExitCode;

use clap::Parser;
use sede_app::{cli, config, state};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = cli::Cli::parse();

    let mut config = match config::Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    tracing::info!(api_url = %config.api_url, "Starting Sede");

    let app_state = match state::AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut notifications = app_state.notifier.subscribe();
    let outcome = cli::run(&app_state, cli.command, &mut notifications).await;
    while let Ok(notification) = notifications.try_recv() {
        cli::report(&notification);
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

use anyhow::Context;
use learning_path_service::{
    clients::build_clients,
    models::{GeneratePathRequest, GeneratePathResponse},
    AppError, Config, FetchOrchestrator, InMemoryPathStore, PathGenerator,
};
use std::io::Read;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing (logs go to stderr, stdout carries the JSON result)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let raw_request = read_request()?;

    match run(&raw_request).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, code = e.status_code(), "Path generation failed");
            println!("{}", serde_json::to_string_pretty(&e.to_response())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(raw_request: &str) -> Result<GeneratePathResponse, AppError> {
    let config = Config::from_env()?;
    info!("Starting {}", config.service.service_name);

    let request: GeneratePathRequest = serde_json::from_str(raw_request)
        .map_err(|e| AppError::InvalidProfile(format!("malformed request: {}", e)))?;

    let mut orchestrator = FetchOrchestrator::new(config.fetch.clone());
    for client in build_clients(&config)? {
        orchestrator.register(client);
    }

    let generator = PathGenerator::new(orchestrator, config.ranking.clone());
    let store = InMemoryPathStore::new();
    let stored = generator.generate_and_store(&request, &store).await?;

    info!(
        path_id = %stored.path_id,
        steps = stored.path.steps.len(),
        resources = stored.path.resource_count(),
        "Path generated"
    );

    Ok(stored.into_response())
}

/// Request JSON from the file named by the first argument, else stdin
fn read_request() -> anyhow::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read request file {}", path)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

//! CI entrypoint that copies Shortcut labels onto the triggering pull request.

use std::process::ExitCode;

use ortho_config::OrthoConfig;
use story_label_sync::telemetry::init_tracing;
use story_label_sync::{LabelSyncConfig, SyncError, SyncOutcome, sync_pull_request};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(Level::INFO);

    match run().await {
        Ok(outcome) => {
            tracing::debug!("sync finished: {outcome:?}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<SyncOutcome, SyncError> {
    let config = load_config()?;
    let request = config.load_request()?;
    sync_pull_request(&config, &request).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<LabelSyncConfig, SyncError> {
    LabelSyncConfig::load().map_err(|error| SyncError::Configuration {
        message: error.to_string(),
    })
}

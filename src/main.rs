#![allow(missing_docs)]

//! nodewatch binary entry point.
//!
//! Linear pipeline: load config → fetch node data → find abnormal nodes →
//! (conditionally) send one alert email. Any stage failure is fatal and
//! exits nonzero; this is the only place the exit code is decided.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use nodewatch::config::RunConfig;
use nodewatch::{logging, Outcome, RunError};

/// Poll a node status API and email an alert for abnormal nodes.
#[derive(Debug, Parser)]
#[command(name = "nodewatch", version, about)]
struct Cli {
    /// Load environment variables from this dotenv file before reading config.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    if let Some(path) = &cli.env_file {
        if let Err(e) = dotenvy::from_path(path) {
            error!(path = %path.display(), error = %e, "failed to load env file");
            return ExitCode::FAILURE;
        }
    } else if let Ok(path) = dotenvy::dotenv() {
        // Best-effort: a missing default .env is not an error.
        info!(path = %path.display(), "loaded .env file");
    }

    match execute().await {
        Ok(Outcome::AlertSent { nodes }) => {
            info!(nodes = %nodes.join(", "), "run complete, alert sent");
            ExitCode::SUCCESS
        }
        Ok(Outcome::AllNormal) => {
            info!("run complete, nothing to report");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

/// Validate the environment and run the pipeline.
async fn execute() -> Result<Outcome, RunError> {
    let config = RunConfig::from_env()?;
    info!(
        nodes = %config.nodes_to_check.join(", "),
        api_url = %config.api_url,
        "configuration loaded"
    );
    nodewatch::run(&config).await
}

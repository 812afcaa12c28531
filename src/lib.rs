//! nodewatch — polls a node status API and emails an alert for abnormal nodes.
//!
//! Single-shot batch job: load config from the environment, fetch node
//! records from the status API, diff them against the monitored list, and
//! send one alert email if anything is flagged abnormal. Stateless by
//! design — an external scheduler re-invokes it; nothing survives between
//! runs.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod detect;
pub mod fetch;
pub mod logging;
pub mod notify;

use tracing::info;

/// Tagged failure reason for one run.
///
/// Every failure is fatal and permanent for this invocation — there is no
/// retry edge anywhere in the pipeline. The binary entry point alone maps
/// a variant to the process exit code; nothing below it terminates the
/// process.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Environment validation failed.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// The status API call failed (transport, HTTP status, or JSON decode).
    #[error(transparent)]
    Fetch(#[from] fetch::FetchError),
    /// The API answered with valid JSON that is not a top-level array.
    #[error("status API returned a non-list payload")]
    PayloadNotList,
    /// Rendering or sending the alert email failed.
    #[error(transparent)]
    Send(#[from] notify::SendError),
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An alert email went out naming these nodes.
    AlertSent {
        /// Abnormal node names, in monitored-list order.
        nodes: Vec<String>,
    },
    /// Every monitored node that was present reported normal; nothing sent.
    AllNormal,
}

/// Execute one monitoring run against an already-validated configuration.
///
/// Strictly sequential: one HTTP call, then (only if abnormal nodes were
/// found) one SMTP session. The payload must be a top-level JSON array
/// before the detector runs.
///
/// # Errors
///
/// Returns [`RunError`] on fetch failure, a non-list payload, or a failed
/// alert send. A monitored node missing from the API data is only a warning.
pub async fn run(config: &config::RunConfig) -> Result<Outcome, RunError> {
    let client = fetch::StatusClient::new()?;
    let payload = client.fetch_nodes(&config.api_url).await?;

    let entries = payload.as_array().ok_or(RunError::PayloadNotList)?;
    let abnormal = detect::find_abnormal_nodes(entries, &config.nodes_to_check);

    if abnormal.is_empty() {
        info!("all monitored nodes normal, no alert needed");
        return Ok(Outcome::AllNormal);
    }

    info!(nodes = %abnormal.join(", "), "abnormal nodes found, sending alert");
    notify::send_alert(config, &abnormal).await?;
    Ok(Outcome::AlertSent { nodes: abnormal })
}

//! Environment-sourced run configuration.
//!
//! All settings come from environment variables (optionally seeded from a
//! dotenv file by the CLI before this module runs). Validation is total:
//! every missing required key is collected and reported in one error rather
//! than failing on the first.

use thiserror::Error;

/// Required environment keys, in reporting order.
const REQUIRED_KEYS: [&str; 7] = [
    "NODE_NAMES",
    "API_URL",
    "RECIPIENT_EMAIL",
    "SMTP_SERVER",
    "SMTP_PORT",
    "MAIL_USERNAME",
    "MAIL_PASSWORD",
];

/// Sender display name when `MAIL_FROM_NAME` is unset.
const DEFAULT_FROM_NAME: &str = "Node Status Monitor";

/// Subject template when `MAIL_SUBJECT` is unset.
const DEFAULT_SUBJECT: &str = "[alert] abnormal nodes: {abnormal_nodes}";

/// Body template when `MAIL_BODY_TEMPLATE` is unset.
const DEFAULT_BODY: &str =
    "The following monitored nodes are reporting an abnormal status: {abnormal_nodes}\n";

/// Errors produced while validating the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required keys are unset or empty. Names every offender.
    #[error("missing required environment variables: {}", keys.join(", "))]
    Missing {
        /// The unset or empty keys, in canonical reporting order.
        keys: Vec<String>,
    },
    /// `SMTP_PORT` did not parse as a valid port number.
    #[error("SMTP_PORT ({value:?}) must be a valid port number")]
    InvalidPort {
        /// The rejected value, verbatim.
        value: String,
    },
}

/// The validated settings governing one invocation.
///
/// Immutable once constructed; no component runs before this exists in
/// full. `Debug` redacts the SMTP password.
#[derive(Clone)]
pub struct RunConfig {
    /// Node names to check, comma-split and trimmed from `NODE_NAMES`.
    pub nodes_to_check: Vec<String>,
    /// Status API endpoint.
    pub api_url: String,
    /// Single alert recipient address.
    pub recipient_email: String,
    /// SMTP relay hostname.
    pub smtp_server: String,
    /// SMTP relay port (implicit TLS).
    pub smtp_port: u16,
    /// SMTP login, also used as the From address.
    pub mail_username: String,
    /// SMTP password.
    pub mail_password: String,
    /// From header display name.
    pub mail_from_name: String,
    /// Subject template containing the `{abnormal_nodes}` placeholder.
    pub mail_subject: String,
    /// Body template containing the `{abnormal_nodes}` placeholder.
    pub mail_body_template: String,
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("nodes_to_check", &self.nodes_to_check)
            .field("api_url", &self.api_url)
            .field("recipient_email", &self.recipient_email)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("mail_username", &self.mail_username)
            .field("mail_password", &"__REDACTED__")
            .field("mail_from_name", &self.mail_from_name)
            .field("mail_subject", &self.mail_subject)
            .field("mail_body_template", &self.mail_body_template)
            .finish()
    }
}

impl RunConfig {
    /// Load and validate configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming every unset or empty
    /// required key, or [`ConfigError::InvalidPort`] when `SMTP_PORT` is
    /// not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load configuration through a custom env resolver (for testing).
    ///
    /// An unset key and a key set to the empty string are treated the same:
    /// both count as missing.
    ///
    /// # Errors
    ///
    /// Same as [`RunConfig::from_env`].
    pub fn from_env_with(
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| env(key).filter(|v| !v.is_empty());

        let mut missing: Vec<String> = Vec::new();
        for key in REQUIRED_KEYS {
            if get(key).is_none() {
                missing.push(key.to_owned());
            }
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing { keys: missing });
        }

        // All required keys are present past this point.
        let require = |key: &str| get(key).unwrap_or_default();

        let port_raw = require("SMTP_PORT");
        let smtp_port: u16 = match port_raw.parse() {
            Ok(0) | Err(_) => {
                return Err(ConfigError::InvalidPort { value: port_raw });
            }
            Ok(port) => port,
        };

        let nodes_to_check = require("NODE_NAMES")
            .split(',')
            .map(|name| name.trim().to_owned())
            .collect();

        Ok(Self {
            nodes_to_check,
            api_url: require("API_URL"),
            recipient_email: require("RECIPIENT_EMAIL"),
            smtp_server: require("SMTP_SERVER"),
            smtp_port,
            mail_username: require("MAIL_USERNAME"),
            mail_password: require("MAIL_PASSWORD"),
            mail_from_name: env("MAIL_FROM_NAME")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_FROM_NAME.to_owned()),
            mail_subject: env("MAIL_SUBJECT")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_owned()),
            mail_body_template: env("MAIL_BODY_TEMPLATE")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_BODY.to_owned()),
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────

//! Alert email rendering and SMTP delivery.
//!
//! Renders the operator-supplied subject and body templates, then submits
//! one plain-text UTF-8 message over an implicit-TLS SMTP session. One
//! send per run, no retry, no queuing.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::config::RunConfig;

/// The single placeholder recognised in subject and body templates.
const PLACEHOLDER: &str = "abnormal_nodes";

/// Errors from rendering or sending the alert email.
#[derive(Debug, Error)]
pub enum SendError {
    /// An operator-supplied template contains anything other than the
    /// `{abnormal_nodes}` placeholder.
    #[error("template error: {0}")]
    Template(String),
    /// A configured email address did not parse.
    #[error("invalid email address {address:?}: {source}")]
    Address {
        /// The rejected address, verbatim.
        address: String,
        /// The underlying parse failure.
        source: lettre::address::AddressError,
    },
    /// The alert message could not be assembled.
    #[error("failed to build alert message: {0}")]
    Message(#[from] lettre::error::Error),
    /// SMTP relay setup, authentication, or submission failed.
    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Substitute `{abnormal_nodes}` into an operator-supplied template.
///
/// This is an explicit single-placeholder formatter, not general string
/// formatting: `{{` and `}}` escape to literal braces, and any other
/// placeholder or unbalanced brace is a template error. Misconfiguration
/// surfaces here rather than as a malformed email.
///
/// # Errors
///
/// Returns [`SendError::Template`] naming the offending token.
pub fn render_template(template: &str, abnormal_nodes: &str) -> Result<String, SendError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    name.push(inner);
                }
                if !closed {
                    return Err(SendError::Template("unclosed '{' in template".to_owned()));
                }
                if name != PLACEHOLDER {
                    return Err(SendError::Template(format!(
                        "unknown placeholder {{{name}}} in template"
                    )));
                }
                out.push_str(abnormal_nodes);
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(SendError::Template("unmatched '}' in template".to_owned()));
                }
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn parse_address(address: &str) -> Result<Address, SendError> {
    address.parse().map_err(|source| SendError::Address {
        address: address.to_owned(),
        source,
    })
}

/// Assemble the plain-text alert message with rendered subject and body.
fn build_message(config: &RunConfig, subject: String, body: String) -> Result<Message, SendError> {
    let from = Mailbox::new(
        Some(config.mail_from_name.clone()),
        parse_address(&config.mail_username)?,
    );
    let to = Mailbox::new(None, parse_address(&config.recipient_email)?);

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(SendError::Message)
}

/// Render the templates and send exactly one alert email.
///
/// The abnormal node names are joined with `", "` before substitution.
/// Transport is an implicit-TLS connection to the configured relay with
/// credential login, torn down after the single submission.
///
/// # Errors
///
/// Returns [`SendError`] on template, address, message-build, or SMTP
/// failure. Nothing is retried.
pub async fn send_alert(config: &RunConfig, abnormal_nodes: &[String]) -> Result<(), SendError> {
    let nodes_joined = abnormal_nodes.join(", ");
    let subject = render_template(&config.mail_subject, &nodes_joined)?;
    let body = render_template(&config.mail_body_template, &nodes_joined)?;

    let message = build_message(config, subject, body)?;

    let credentials = Credentials::new(
        config.mail_username.clone(),
        config.mail_password.clone(),
    );
    let mailer: AsyncSmtpTransport<Tokio1Executor> =
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)?
            .credentials(credentials)
            .port(config.smtp_port)
            .build();

    info!(recipient = %config.recipient_email, "sending alert email");
    let response = mailer.send(message).await?;
    info!(code = %response.code(), "alert email accepted by relay");
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────

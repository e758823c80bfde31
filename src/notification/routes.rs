//! Resolution of reporting targets from configuration.
//!
//! Both pipelines route through these functions, so the async and blocking
//! notifiers always agree on which sinks receive a message and where.

use crate::config::ReportingConfig;
use crate::models::ChatMessage;
use crate::notification::NotifyError;
use reqwest::Url;
use serde_json::Value;
use std::fmt;
use tracing::error;

pub const REPORT_ISSUE_PATH: &str = "/reportIssue";
pub const EPOCH_PROCESSING_ISSUE_PATH: &str = "/reportEpochProcessingIssue";
pub const SNAPSHOT_ISSUE_PATH: &str = "/reportSnapshotIssue";

/// The external destination of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    ReportingService,
    Slack,
    Telegram,
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sink::ReportingService => "reporting_service",
            Sink::Slack => "slack",
            Sink::Telegram => "telegram",
        };
        f.write_str(name)
    }
}

/// A sink that should receive the message, with its resolved URL.
///
/// URL errors are kept rather than raised so that they are reported through
/// the same result handler as any other failed send.
pub type Target = (Sink, Result<Url, NotifyError>);

/// The configured targets of a generic issue report, in dispatch order.
pub fn issue_targets(reporting: &ReportingConfig) -> Vec<Target> {
    let mut targets = Vec::with_capacity(2);
    if let Some(base) = reporting.service_url() {
        targets.push((Sink::ReportingService, join(base, REPORT_ISSUE_PATH)));
    }
    if let Some(webhook) = reporting.slack_url() {
        targets.push((Sink::Slack, parse(webhook)));
    }
    targets
}

/// The gateway endpoint for `message`, or `None` when Telegram reporting is
/// not fully configured.
pub fn chat_target(reporting: &ReportingConfig, message: &ChatMessage) -> Option<Target> {
    let (base, _chat_id) = reporting.telegram()?;
    Some((Sink::Telegram, join(base, chat_path(message))))
}

pub fn chat_path(message: &ChatMessage) -> &'static str {
    match message {
        ChatMessage::EpochProcessingReport(_) => EPOCH_PROCESSING_ISSUE_PATH,
        ChatMessage::SnapshotReport(_) => SNAPSHOT_ISSUE_PATH,
    }
}

/// Builds a [`ChatMessage`] from an untyped kind and JSON payload.
///
/// Unknown kinds and malformed payloads are logged and yield `None`; nothing
/// must be sent for them.
pub fn parse_chat_message(kind: &str, payload: Value) -> Option<ChatMessage> {
    let parsed = match kind {
        "epoch_processing" => {
            serde_json::from_value(payload).map(ChatMessage::EpochProcessingReport)
        }
        "snapshot" => serde_json::from_value(payload).map(ChatMessage::SnapshotReport),
        other => {
            let err = NotifyError::UnsupportedMessage(other.to_string());
            error!("{} - message not sent", err);
            return None;
        }
    };
    match parsed {
        Ok(message) => Some(message),
        Err(e) => {
            error!(kind, error = %e, "Malformed chat message payload - message not sent");
            None
        }
    }
}

/// Joins `path` onto `base` the way a browser resolves a link, so an absolute
/// path replaces whatever path `base` carries.
fn join(base: &str, path: &str) -> Result<Url, NotifyError> {
    parse(base)?.join(path).map_err(|e| NotifyError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

fn parse(url: &str) -> Result<Url, NotifyError> {
    Url::parse(url).map_err(|e| NotifyError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

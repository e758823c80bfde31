//! Report payloads sent to the reporting sinks.
//!
//! Field names follow the wire format expected by the reporting service and
//! the Telegram gateway, hence the explicit serde renames.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// An internal failure reported by a snapshotter instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SnapshotterIssue {
    #[serde(rename = "instanceID")]
    pub instance_id: String,
    #[serde(rename = "issueType")]
    pub issue_type: String,
    #[serde(rename = "projectID")]
    pub project_id: String,
    #[serde(rename = "epochId")]
    pub epoch_id: String,
    /// Unix timestamp (seconds) at which the issue was detected.
    #[serde(rename = "timeOfReporting")]
    pub time_of_reporting: String,
    #[serde(default)]
    pub extra: Option<String>,
}

impl SnapshotterIssue {
    /// Creates an issue stamped with the current time.
    pub fn now(
        instance_id: impl Into<String>,
        issue_type: impl Into<String>,
        project_id: impl Into<String>,
        epoch_id: impl Into<String>,
        extra: Option<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            issue_type: issue_type.into(),
            project_id: project_id.into(),
            epoch_id: epoch_id.into(),
            time_of_reporting: Utc::now().timestamp().to_string(),
            extra,
        }
    }
}

/// Submission counters attached to snapshot reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotterStatus {
    pub total_successful_submissions: u64,
    pub total_missed_submissions: u64,
    pub consecutive_missed_submissions: u64,
}

/// An epoch that could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EpochProcessingIssue {
    #[serde(rename = "instanceID")]
    pub instance_id: String,
    pub epoch_id: String,
    pub time_of_reporting: String,
    #[serde(default)]
    pub extra: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EpochProcessingReportMessage {
    pub chat_id: i64,
    pub slot_id: u64,
    pub issue: EpochProcessingIssue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotReportMessage {
    pub chat_id: i64,
    pub slot_id: u64,
    pub issue: SnapshotterIssue,
    pub status: SnapshotterStatus,
}

/// A message for the Telegram bot gateway.
///
/// Serialized untagged: the request body is the payload of the variant, the
/// variant itself only selects the gateway endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ChatMessage {
    EpochProcessingReport(EpochProcessingReportMessage),
    SnapshotReport(SnapshotReportMessage),
}

impl ChatMessage {
    /// Short name of the variant, used in logs and on the command line.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatMessage::EpochProcessingReport(_) => "epoch_processing",
            ChatMessage::SnapshotReport(_) => "snapshot",
        }
    }
}

impl From<EpochProcessingReportMessage> for ChatMessage {
    fn from(message: EpochProcessingReportMessage) -> Self {
        ChatMessage::EpochProcessingReport(message)
    }
}

impl From<SnapshotReportMessage> for ChatMessage {
    fn from(message: SnapshotReportMessage) -> Self {
        ChatMessage::SnapshotReport(message)
    }
}

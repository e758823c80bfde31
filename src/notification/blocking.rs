//! Notifier that sends inline, for shutdown and cleanup paths where no
//! runtime is available.

use crate::config::{Config, ReportingConfig};
use crate::models::{ChatMessage, SnapshotterIssue};
use crate::notification::{
    client::{BlockingHttpPoster, BlockingReqwestPoster},
    result::run_blocking_send,
    routes::{self, Target},
    NotifyError,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// Dispatches notifications and waits for each to complete.
///
/// Every send goes through [`run_blocking_send`], so a `notify_*` call only
/// returns once its requests have been answered or have failed, and it never
/// reports the failure to the caller.
pub struct BlockingNotifier<C: BlockingHttpPoster = BlockingReqwestPoster> {
    client: C,
    reporting: ReportingConfig,
    trace_enabled: bool,
}

impl BlockingNotifier<BlockingReqwestPoster> {
    /// Creates a notifier backed by a blocking `reqwest` client.
    ///
    /// Must not be called from within an async runtime.
    pub fn from_config(config: &Config) -> Result<Self, NotifyError> {
        let client = BlockingReqwestPoster::new(&config.http)?;
        Ok(Self::new(client, config))
    }
}

impl<C: BlockingHttpPoster> BlockingNotifier<C> {
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            reporting: config.reporting.clone(),
            trace_enabled: config.logs.trace_enabled,
        }
    }

    /// Reports `message` to the reporting service and the chat-ops webhook,
    /// each only if configured.
    #[instrument(skip_all, fields(issue_type = %message.issue_type))]
    pub fn notify_issue(&self, message: &SnapshotterIssue) {
        for target in routes::issue_targets(&self.reporting) {
            self.send(target, message);
        }
    }

    /// Sends `message` to the Telegram gateway endpoint for its kind.
    #[instrument(skip_all, fields(kind = message.kind()))]
    pub fn notify_chat(&self, message: &ChatMessage) {
        match routes::chat_target(&self.reporting, message) {
            Some(target) => self.send(target, message),
            None => debug!("Telegram reporting not configured, skipping"),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn send<M: Serialize>(&self, (sink, url): Target, message: &M) {
        run_blocking_send(
            sink,
            || {
                let url = url?;
                let body = serde_json::to_value(message)?;
                self.client.post_json(url, &body)
            },
            self.trace_enabled,
        );
    }
}

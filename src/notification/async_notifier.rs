//! Fire-and-forget notifier for code running inside the tokio runtime.

use crate::config::{Config, ReportingConfig};
use crate::models::{ChatMessage, SnapshotterIssue};
use crate::notification::{
    client::{HttpPoster, ReqwestPoster},
    pending::PendingSends,
    result::observe_pending,
    routes::{self, Target},
    Delivery, NotifyError,
};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, Instrument};

/// Dispatches notifications without waiting for them.
///
/// Every send runs in its own task and is watched by a second task that logs
/// the outcome. The `notify_*` methods are synchronous and never wait on the
/// network, but they must be called from within a tokio runtime.
pub struct AsyncNotifier<C: HttpPoster + 'static = ReqwestPoster> {
    client: Arc<C>,
    reporting: ReportingConfig,
    trace_enabled: bool,
    pending: PendingSends,
}

impl AsyncNotifier<ReqwestPoster> {
    /// Creates a notifier backed by a `reqwest` client configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self, NotifyError> {
        let client = ReqwestPoster::new(&config.http)?;
        Ok(Self::new(Arc::new(client), config))
    }
}

impl<C: HttpPoster + 'static> AsyncNotifier<C> {
    pub fn new(client: Arc<C>, config: &Config) -> Self {
        Self {
            client,
            reporting: config.reporting.clone(),
            trace_enabled: config.logs.trace_enabled,
            pending: PendingSends::new(),
        }
    }

    /// Reports `message` to the reporting service and the chat-ops webhook,
    /// each only if configured.
    #[instrument(skip_all, fields(issue_type = %message.issue_type))]
    pub fn notify_issue(&self, message: &SnapshotterIssue) {
        for target in routes::issue_targets(&self.reporting) {
            self.dispatch(target, message);
        }
    }

    /// Sends `message` to the Telegram gateway endpoint for its kind.
    ///
    /// Does nothing unless both the gateway URL and chat id are configured.
    #[instrument(skip_all, fields(kind = message.kind()))]
    pub fn notify_chat(&self, message: &ChatMessage) {
        match routes::chat_target(&self.reporting, message) {
            Some(target) => self.dispatch(target, message),
            None => debug!("Telegram reporting not configured, skipping"),
        }
    }

    /// The number of notifications whose outcome has not been logged yet.
    pub fn in_flight(&self) -> usize {
        self.pending.in_flight()
    }

    /// Waits until every notification dispatched so far has settled.
    pub async fn drain(&self) {
        self.pending.drain().await;
    }

    fn dispatch<M: Serialize>(&self, (sink, url): Target, message: &M) {
        let body = serde_json::to_value(message).map_err(NotifyError::from);
        let send =
            tokio::spawn(deliver(Arc::clone(&self.client), url, body).in_current_span());
        let observer =
            tokio::spawn(observe_pending(sink, send, self.trace_enabled).in_current_span());
        self.pending.track(observer);
    }
}

async fn deliver<C: HttpPoster>(
    client: Arc<C>,
    url: Result<Url, NotifyError>,
    body: Result<Value, NotifyError>,
) -> Result<Delivery, NotifyError> {
    client.post_json(url?, &body?).await
}

//! Best-effort delivery of issue reports to external reporting sinks.
//!
//! Two pipelines share the same routing rules. The [`AsyncNotifier`] spawns
//! every send as its own task and returns immediately, while the
//! [`BlockingNotifier`] performs each request inline for contexts without a
//! running runtime. In both, the result handlers in [`result`] are the only
//! place a delivery outcome is observed: failures become log lines and never
//! reach the caller.
pub mod async_notifier;
pub mod blocking;
pub mod client;
pub mod pending;
pub mod result;
pub mod routes;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use reqwest::Url;
use std::fmt;
use thiserror::Error;

pub use async_notifier::AsyncNotifier;
pub use blocking::BlockingNotifier;
pub use client::{BlockingHttpPoster, BlockingReqwestPoster, HttpPoster, ReqwestPoster};
pub use pending::PendingSends;
pub use routes::{parse_chat_message, Sink};

/// A request the sink accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub url: Url,
    pub status: u16,
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.url, self.status)
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid sink URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to serialize notification body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("sink {url} responded with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unsupported chat message type: {0}")]
    UnsupportedMessage(String),

    #[error("notification task failed: {0}")]
    TaskFailed(String),
}

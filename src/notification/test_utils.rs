use crate::notification::{
    client::{BlockingHttpPoster, HttpPoster},
    Delivery, NotifyError,
};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fake HTTP client that records every POST instead of sending it.
///
/// Implements both the async and the blocking client traits so the same fake
/// drives either pipeline.
#[derive(Clone, Default)]
pub struct RecordingPoster {
    requests: Arc<Mutex<Vec<(Url, Value)>>>,
    failing: Arc<HashSet<String>>,
    delay: Option<Duration>,
}

impl RecordingPoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every POST to `url` fail with a transport-like error.
    pub fn failing_for(mut self, url: &str) -> Self {
        let mut failing = (*self.failing).clone();
        failing.insert(url.to_string());
        self.failing = Arc::new(failing);
        self
    }

    /// Delays every response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The URLs posted to so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.to_string())
            .collect()
    }

    /// The bodies posted so far, in order.
    pub fn bodies(&self) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn record(&self, url: Url, body: &Value) -> Result<Delivery, NotifyError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.clone(), body.clone()));
        if self.failing.contains(url.as_str()) {
            return Err(NotifyError::Status {
                url: url.to_string(),
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        Ok(Delivery { url, status: 200 })
    }
}

#[async_trait]
impl HttpPoster for RecordingPoster {
    async fn post_json(&self, url: Url, body: &Value) -> Result<Delivery, NotifyError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.record(url, body)
    }
}

impl BlockingHttpPoster for RecordingPoster {
    fn post_json(&self, url: Url, body: &Value) -> Result<Delivery, NotifyError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.record(url, body)
    }
}

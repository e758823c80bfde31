//! HTTP clients used to reach the reporting sinks.

use crate::config::HttpConfig;
use crate::notification::{Delivery, NotifyError};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

/// A client that can POST a JSON body without blocking the runtime.
#[async_trait]
pub trait HttpPoster: Send + Sync {
    /// Posts `body` to `url`. Non-success statuses are reported as errors.
    async fn post_json(&self, url: Url, body: &Value) -> Result<Delivery, NotifyError>;
}

/// A client that POSTs a JSON body and blocks until the response arrives.
pub trait BlockingHttpPoster: Send + Sync {
    /// Posts `body` to `url`. Non-success statuses are reported as errors.
    fn post_json(&self, url: Url, body: &Value) -> Result<Delivery, NotifyError>;
}

/// `reqwest`-backed async client.
#[derive(Clone, Debug)]
pub struct ReqwestPoster {
    client: reqwest::Client,
}

impl ReqwestPoster {
    pub fn new(config: &HttpConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpPoster for ReqwestPoster {
    async fn post_json(&self, url: Url, body: &Value) -> Result<Delivery, NotifyError> {
        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(Delivery {
                url,
                status: status.as_u16(),
            });
        }
        let text = response.text().await.unwrap_or_default();
        Err(NotifyError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: summarize_body(&text),
        })
    }
}

/// `reqwest`-backed blocking client.
///
/// Must be built, used and dropped outside of an async runtime.
#[derive(Clone, Debug)]
pub struct BlockingReqwestPoster {
    client: reqwest::blocking::Client,
}

impl BlockingReqwestPoster {
    pub fn new(config: &HttpConfig) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl BlockingHttpPoster for BlockingReqwestPoster {
    fn post_json(&self, url: Url, body: &Value) -> Result<Delivery, NotifyError> {
        let response = self.client.post(url.clone()).json(body).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(Delivery {
                url,
                status: status.as_u16(),
            });
        }
        let text = response.text().unwrap_or_default();
        Err(NotifyError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: summarize_body(&text),
        })
    }
}

/// Longest response body, in characters, kept in a status error.
const MAX_BODY_CHARS: usize = 256;

/// Collapses a response body onto one line and caps its length, so a rejected
/// request never turns into a multi-line log record.
fn summarize_body(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &collapsed[..cut]),
        None => collapsed,
    }
}

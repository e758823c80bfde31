//! Configuration management for the snapshotter notifier
//!
//! This module defines the main `Config` struct and its sub-structs,
//! responsible for holding all notification settings. It uses the `figment`
//! crate to load configuration from an optional TOML file and merge it with
//! environment variables and command-line arguments.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cli::Cli;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Log output behaviour.
    pub logs: LogsConfig,
    /// Endpoints of the external reporting sinks.
    pub reporting: ReportingConfig,
    /// Settings for the outbound HTTP clients.
    pub http: HttpConfig,
}

/// Log output behaviour.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct LogsConfig {
    /// Log notification failures with their full cause chain.
    #[serde(default)]
    pub trace_enabled: bool,
}

/// Endpoints of the external reporting sinks.
///
/// Every field is optional. An unset value disables the corresponding sink
/// without raising an error. URLs that are empty or whitespace-only also count
/// as unset; they are skipped rather than attempted and logged as failures.
/// A chat id of `0` counts as unset.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ReportingConfig {
    /// Base URL of the issue reporting service. Issues go to `/reportIssue`.
    #[serde(default)]
    pub service_url: Option<String>,
    /// Chat-ops incoming webhook URL, used verbatim.
    #[serde(default)]
    pub slack_url: Option<String>,
    /// Base URL of the Telegram bot gateway.
    #[serde(default)]
    pub telegram_url: Option<String>,
    /// Telegram chat the gateway should deliver to.
    #[serde(default)]
    pub telegram_chat_id: Option<i64>,
}

impl ReportingConfig {
    /// The reporting service base URL, if configured.
    pub fn service_url(&self) -> Option<&str> {
        non_blank(&self.service_url)
    }

    /// The chat-ops webhook URL, if configured.
    pub fn slack_url(&self) -> Option<&str> {
        non_blank(&self.slack_url)
    }

    /// The Telegram gateway URL and chat id, if both are configured.
    pub fn telegram(&self) -> Option<(&str, i64)> {
        let chat_id = self.telegram_chat_id.filter(|id| *id != 0)?;
        Some((non_blank(&self.telegram_url)?, chat_id))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Settings for the outbound HTTP clients.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

impl Config {
    /// Loads the configuration by layering defaults, the optional TOML file
    /// named by the CLI, `SNAPSHOTTER_` environment variables, and finally
    /// the CLI arguments themselves.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment
            // e.g. SNAPSHOTTER_REPORTING__SLACK_URL=https://hooks.slack.com/...
            .merge(Env::prefixed("SNAPSHOTTER_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            logs: LogsConfig::default(),
            reporting: ReportingConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

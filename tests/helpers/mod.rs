#![allow(dead_code)]
pub mod log_capture;

use snapshotter_notify::config::{Config, ReportingConfig};
use snapshotter_notify::models::SnapshotterIssue;
use std::net::TcpListener;

/// Builds a config that only differs from the defaults in its sinks.
pub fn config_with(reporting: ReportingConfig) -> Config {
    Config {
        reporting,
        ..Default::default()
    }
}

pub fn sample_issue() -> SnapshotterIssue {
    SnapshotterIssue {
        instance_id: "node-1".to_string(),
        issue_type: "MISSED_SNAPSHOT".to_string(),
        project_id: "pairContract_trade_volume:0xabc".to_string(),
        epoch_id: "42".to_string(),
        time_of_reporting: "1700000000".to_string(),
        extra: Some("{\"reason\":\"rpc timeout\"}".to_string()),
    }
}

/// An HTTP base URL on which nothing is listening.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

/// snapshotter-notify - best-effort issue reporting for snapshotter nodes
///
/// This library dispatches issue reports to external reporting sinks without
/// ever letting a delivery failure reach the caller, and declares the
/// processor contract used by snapshot computation.
pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod notification;
pub mod processor;

pub use models::{ChatMessage, SnapshotterIssue};
pub use notification::{AsyncNotifier, BlockingNotifier};

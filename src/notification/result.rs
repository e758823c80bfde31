//! Result handlers that turn notification failures into log lines.
//!
//! Whatever happens while a notification is sent (connection errors,
//! timeouts, rejected requests, even a panic inside the send) ends here.
//! Neither handler returns anything to its caller.

use crate::notification::{routes::Sink, Delivery, NotifyError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Waits for a spawned send and logs its outcome.
///
/// Meant to run as its own task, so it completes whether the send succeeded,
/// failed, panicked or was aborted.
pub async fn observe_pending(
    sink: Sink,
    pending: JoinHandle<Result<Delivery, NotifyError>>,
    trace_enabled: bool,
) {
    let outcome = match pending.await {
        Ok(outcome) => outcome,
        Err(e) => Err(NotifyError::TaskFailed(e.to_string())),
    };
    log_outcome(sink, outcome, trace_enabled);
}

/// Runs a deferred send immediately and logs its outcome.
pub fn run_blocking_send<F>(sink: Sink, send: F, trace_enabled: bool)
where
    F: FnOnce() -> Result<Delivery, NotifyError>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(send))
        .unwrap_or_else(|payload| Err(NotifyError::TaskFailed(panic_message(payload))));
    log_outcome(sink, outcome, trace_enabled);
}

fn log_outcome(sink: Sink, outcome: Result<Delivery, NotifyError>, trace_enabled: bool) {
    match outcome {
        Ok(delivery) => debug!(%sink, %delivery, "Notification delivered"),
        Err(e) if trace_enabled => {
            let report = anyhow::Error::new(e);
            error!(%sink, "Failed to send notification: {:?}", report);
        }
        Err(e) => error!(%sink, "Failed to send notification: {}", e),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "send panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_blocking_send_runs_immediately() {
        let ran = AtomicBool::new(false);

        run_blocking_send(
            Sink::Slack,
            || {
                ran.store(true, Ordering::SeqCst);
                Ok(Delivery {
                    url: Url::parse("https://hooks.example/x").unwrap(),
                    status: 200,
                })
            },
            false,
        );

        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_blocking_send_swallows_errors_and_panics() {
        run_blocking_send(
            Sink::ReportingService,
            || Err(NotifyError::TaskFailed("boom".to_string())),
            true,
        );
        run_blocking_send(Sink::Telegram, || panic!("sink exploded"), false);
    }

    #[tokio::test]
    async fn test_observer_swallows_panicked_send() {
        let pending: JoinHandle<Result<Delivery, NotifyError>> =
            tokio::spawn(async { panic!("sink exploded") });

        observe_pending(Sink::Telegram, pending, true).await;
    }

    #[tokio::test]
    async fn test_observer_swallows_aborted_send() {
        let pending = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Err(NotifyError::TaskFailed("unreachable".to_string()))
        });
        pending.abort();

        observe_pending(Sink::Slack, pending, false).await;
    }

    #[test]
    fn test_panic_message_extracts_text() {
        let payload = panic::catch_unwind(|| panic!("static text")).unwrap_err();
        assert_eq!(panic_message(payload), "static text");

        let payload = panic::catch_unwind(|| panic!("{} text", "formatted")).unwrap_err();
        assert_eq!(panic_message(payload), "formatted text");
    }
}

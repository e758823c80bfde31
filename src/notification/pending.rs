//! Tracks in-flight notifications so they can be awaited before exit.
use futures::future::join_all;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Handles of the completion observers spawned by the async pipeline.
///
/// Finished handles are pruned whenever a new one is tracked, so a
/// long-running process only ever holds the sends that are still running.
#[derive(Clone, Debug, Default)]
pub struct PendingSends {
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl PendingSends {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer handle to the tracked set.
    pub fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// The number of observers that have not completed yet.
    pub fn in_flight(&self) -> usize {
        self.lock().iter().filter(|h| !h.is_finished()).count()
    }

    /// Waits for every tracked notification to be delivered or to fail.
    pub async fn drain(&self) {
        let handles = self.lock().drain(..).collect::<Vec<_>>();
        if handles.is_empty() {
            return;
        }
        info!("Waiting for {} pending notifications...", handles.len());

        let results = join_all(handles).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            error!("{} notification observers did not complete cleanly.", failed);
        } else {
            debug!("All pending notifications settled.");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        // The guarded Vec stays consistent even if a holder panicked.
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_drain_waits_for_all_handles() {
        let pending = PendingSends::new();
        let done = Arc::new(AtomicUsize::new(0));

        for delay in [10, 30, 50] {
            let done = done.clone();
            pending.track(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                done.fetch_add(1, Ordering::SeqCst);
            }));
        }

        pending.drain().await;

        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert_eq!(pending.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_track_prunes_finished_handles() {
        let pending = PendingSends::new();
        let finished = tokio::spawn(async {});
        while !finished.is_finished() {
            tokio::task::yield_now().await;
        }
        pending.track(finished);

        pending.track(tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }));

        assert_eq!(pending.handles.lock().unwrap().len(), 1);
        pending.drain().await;
    }
}

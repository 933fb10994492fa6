//! Search debouncer
//!
//! Each call to [`SearchDebouncer::wait`] starts a quiet period. A newer
//! call cancels the older one's pending wait, so only the last call inside
//! the window proceeds.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

#[derive(Default)]
struct Pending {
    /// Incremented for every wait; identifies the current one
    seq: u64,
    token: Option<CancellationToken>,
}

/// Coalesces rapid calls into the last one
pub struct SearchDebouncer {
    delay: Duration,
    pending: Mutex<Pending>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(Pending::default()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits out the quiet period
    ///
    /// Returns `true` if this call survived the window, `false` if a later
    /// call (or [`SearchDebouncer::cancel_pending`]) superseded it.
    pub async fn wait(&self) -> bool {
        let token = CancellationToken::new();
        let seq = {
            let mut pending = self.lock();
            if let Some(previous) = pending.token.replace(token.clone()) {
                previous.cancel();
            }
            pending.seq += 1;
            pending.seq
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                trace!(seq, "Debounced call superseded");
                false
            }
            _ = tokio::time::sleep(self.delay) => {
                let mut pending = self.lock();
                if pending.seq == seq {
                    pending.token = None;
                }
                !token.is_cancelled()
            }
        }
    }

    /// Cancels the pending wait, if any
    pub fn cancel_pending(&self) {
        if let Some(token) = self.lock().token.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_single_wait_completes() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(300));
        assert!(debouncer.wait().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_call_supersedes_earlier() {
        let debouncer = Arc::new(SearchDebouncer::new(Duration::from_millis(300)));

        let first = tokio::spawn({
            let d = debouncer.clone();
            async move { d.wait().await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = tokio::spawn({
            let d = debouncer.clone();
            async move { d.wait().await }
        });

        assert!(!first.await.unwrap());
        assert!(second.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_outside_window_both_complete() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(300));
        assert!(debouncer.wait().await);
        assert!(debouncer.wait().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending() {
        let debouncer = Arc::new(SearchDebouncer::new(Duration::from_millis(300)));
        let waiting = tokio::spawn({
            let d = debouncer.clone();
            async move { d.wait().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        debouncer.cancel_pending();
        assert!(!waiting.await.unwrap());
    }
}

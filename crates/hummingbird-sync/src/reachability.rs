//! Reachability monitor - mirrors platform path updates as a watch value
//!
//! The [`ReachabilityMonitor`] consumes connectivity observations from a
//! platform observer and republishes them as a [`NetworkStatus`] that any
//! number of consumers can read or await.
//!
//! ## Flow
//!
//! ```text
//! platform observer ──→ mpsc::Receiver<PathUpdate> ──→ monitor task ──→ watch<NetworkStatus>
//! ```
//!
//! The status starts as `Unknown` and only changes on real transitions;
//! repeated identical observations are not republished. Dropping the monitor
//! (or calling [`ReachabilityMonitor::shutdown`]) stops the task.

use std::net::SocketAddr;
use std::time::Duration;

use hummingbird_core::domain::NetworkStatus;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Capacity of the channel returned by [`ReachabilityMonitor::channel`]
pub const DEFAULT_UPDATE_CAPACITY: usize = 16;

/// A single observation from a platform path monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathUpdate {
    /// A usable network path exists
    Satisfied,
    /// No usable network path
    Unsatisfied,
}

impl From<PathUpdate> for NetworkStatus {
    fn from(update: PathUpdate) -> Self {
        match update {
            PathUpdate::Satisfied => NetworkStatus::Connected,
            PathUpdate::Unsatisfied => NetworkStatus::Disconnected,
        }
    }
}

/// Publishes the current [`NetworkStatus`]
pub struct ReachabilityMonitor {
    status_rx: watch::Receiver<NetworkStatus>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ReachabilityMonitor {
    /// Creates the update channel a platform observer should feed
    pub fn channel() -> (mpsc::Sender<PathUpdate>, mpsc::Receiver<PathUpdate>) {
        mpsc::channel(DEFAULT_UPDATE_CAPACITY)
    }

    /// Starts monitoring `updates`
    ///
    /// Must be called from within a tokio runtime. The task ends when the
    /// sender side is dropped or the monitor is shut down; the last
    /// published status stays readable afterwards.
    pub fn spawn(mut updates: mpsc::Receiver<PathUpdate>) -> Self {
        let (status_tx, status_rx) = watch::channel(NetworkStatus::Unknown);
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let task = tokio::spawn(async move {
            debug!("Reachability monitor started");
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Reachability monitor cancelled");
                        break;
                    }
                    update = updates.recv() => {
                        let Some(update) = update else {
                            debug!("Path update channel closed");
                            break;
                        };
                        let next = NetworkStatus::from(update);
                        let changed = status_tx.send_if_modified(|current| {
                            if *current == next {
                                false
                            } else {
                                *current = next;
                                true
                            }
                        });
                        if changed {
                            info!(status = %next, "Network status changed");
                        }
                    }
                }
            }
        });

        Self {
            status_rx,
            shutdown,
            task: Some(task),
        }
    }

    /// A monitor pinned to `status` with no background task
    ///
    /// For hosts without a platform observer.
    pub fn fixed(status: NetworkStatus) -> Self {
        let (_status_tx, status_rx) = watch::channel(status);
        Self {
            status_rx,
            shutdown: CancellationToken::new(),
            task: None,
        }
    }

    /// Current status
    pub fn status(&self) -> NetworkStatus {
        *self.status_rx.borrow()
    }

    /// A receiver that observes every future transition
    pub fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.status_rx.clone()
    }

    /// Stops the monitor task; the last status stays readable
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ReachabilityMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Produces one observation by attempting a TCP connection to `addr`
///
/// Used by hosts that have no platform path monitor: a single probe at
/// startup, no polling.
pub async fn probe_once(addr: SocketAddr, timeout: Duration) -> PathUpdate {
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_)) => PathUpdate::Satisfied,
        Ok(Err(e)) => {
            debug!(%addr, error = %e, "Reachability probe failed");
            PathUpdate::Unsatisfied
        }
        Err(_) => {
            debug!(%addr, "Reachability probe timed out");
            PathUpdate::Unsatisfied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_unknown() {
        let (_tx, rx) = ReachabilityMonitor::channel();
        let monitor = ReachabilityMonitor::spawn(rx);
        assert_eq!(monitor.status(), NetworkStatus::Unknown);
    }

    #[tokio::test]
    async fn test_publishes_transitions() {
        let (tx, rx) = ReachabilityMonitor::channel();
        let monitor = ReachabilityMonitor::spawn(rx);
        let mut status = monitor.subscribe();

        tx.send(PathUpdate::Unsatisfied).await.unwrap();
        status.changed().await.unwrap();
        assert_eq!(*status.borrow_and_update(), NetworkStatus::Disconnected);

        tx.send(PathUpdate::Satisfied).await.unwrap();
        status.changed().await.unwrap();
        assert_eq!(*status.borrow_and_update(), NetworkStatus::Connected);
        assert_eq!(monitor.status(), NetworkStatus::Connected);
    }

    #[tokio::test]
    async fn test_duplicate_updates_are_not_republished() {
        let (tx, rx) = ReachabilityMonitor::channel();
        let monitor = ReachabilityMonitor::spawn(rx);
        let mut status = monitor.subscribe();

        tx.send(PathUpdate::Satisfied).await.unwrap();
        status.changed().await.unwrap();
        status.borrow_and_update();

        tx.send(PathUpdate::Satisfied).await.unwrap();
        tx.send(PathUpdate::Unsatisfied).await.unwrap();
        status.changed().await.unwrap();
        // The duplicate was swallowed; the next change is the real transition
        assert_eq!(*status.borrow_and_update(), NetworkStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_shutdown_stops_task_and_keeps_last_status() {
        let (tx, rx) = ReachabilityMonitor::channel();
        let mut monitor = ReachabilityMonitor::spawn(rx);
        let mut status = monitor.subscribe();

        tx.send(PathUpdate::Satisfied).await.unwrap();
        status.changed().await.unwrap();

        monitor.shutdown();
        assert!(!monitor.is_running());
        assert_eq!(monitor.status(), NetworkStatus::Connected);
        // The task dropped its sender, so further waits end immediately
        assert!(status.changed().await.is_err());
    }

    #[tokio::test]
    async fn test_fixed_monitor() {
        let monitor = ReachabilityMonitor::fixed(NetworkStatus::Disconnected);
        assert_eq!(monitor.status(), NetworkStatus::Disconnected);
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn test_probe_once_against_local_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert_eq!(
            probe_once(addr, Duration::from_secs(1)).await,
            PathUpdate::Satisfied
        );

        drop(listener);
        assert_eq!(
            probe_once(addr, Duration::from_secs(1)).await,
            PathUpdate::Unsatisfied
        );
    }
}

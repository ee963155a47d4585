//! Background connectivity monitoring.
//!
//! A fixed-interval task asks a [`ConnectivityProbe`] whether the network is
//! reachable, logs every answer, and publishes a `networkStatus` event on the
//! hub whenever the answer changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use orderapp_events::{DataStoreEvent, EventBus, Hub};

/// Answers "is the network reachable right now?".
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_connected(&self) -> bool;
}

/// Probe with a fixed, externally settable answer.
#[derive(Debug)]
pub struct StaticProbe {
    connected: AtomicBool,
}

impl StaticProbe {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }

    pub fn set(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectivityProbe for StaticProbe {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Probe that dials a TCP address; connected means the handshake finished
/// within the timeout.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_connected(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(self.addr.as_str())).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!("connectivity probe to {} failed: {}", self.addr, e);
                false
            }
            Err(_) => {
                tracing::debug!("connectivity probe to {} timed out", self.addr);
                false
            }
        }
    }
}

/// Running connectivity monitor. Dropping it aborts the task; prefer
/// [`ConnectivityMonitor::shutdown`] for a clean stop.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    shutdown: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl ConnectivityMonitor {
    /// Start polling `probe` every `interval`, beginning immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(probe: Arc<dyn ConnectivityProbe>, hub: Hub, interval: Duration) -> Self {
        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();

        let task = tokio::spawn(async move {
            tracing::info!("connectivity monitor started");

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut last: Option<bool> = None;

            loop {
                tokio::select! {
                    _ = signal.notified() => {
                        tracing::info!("connectivity monitor received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let connected = probe.is_connected().await;
                        tracing::info!(connected, "timer network connected {}", connected);

                        if last != Some(connected) {
                            last = Some(connected);
                            let _ = hub.publish(DataStoreEvent::network_status(connected));
                        }
                    }
                }
            }

            tracing::info!("connectivity monitor stopped");
        });

        Self {
            shutdown,
            task: Some(task),
        }
    }

    /// Signal the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.shutdown.notify_one();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderapp_events::DataStoreChannelEventName;

    const WAIT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn publishes_initial_state_and_transitions_only() {
        let hub = Hub::new();
        let mut status = hub.subscribe_to(DataStoreChannelEventName::NetworkStatus.as_str());
        let probe = Arc::new(StaticProbe::new(true));

        let monitor = ConnectivityMonitor::spawn(probe.clone(), hub.clone(), Duration::from_millis(10));

        let first = status.recv_timeout(WAIT).await.unwrap();
        assert_eq!(first.network_status_event().map(|e| e.active), Some(true));

        // Several polls with the same answer publish nothing new.
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(status.try_recv().is_none());

        probe.set(false);
        let second = status.recv_timeout(WAIT).await.unwrap();
        assert_eq!(second.network_status_event().map(|e| e.active), Some(false));

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_stops_the_task() {
        let hub = Hub::new();
        let monitor = ConnectivityMonitor::spawn(Arc::new(StaticProbe::new(true)), hub, Duration::from_secs(60));
        assert!(!monitor.is_finished());
        tokio::time::timeout(WAIT, monitor.shutdown()).await.unwrap();
    }

    #[tokio::test]
    async fn tcp_probe_reports_unreachable_address() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        assert!(TcpProbe::new(addr.to_string()).is_connected().await);

        drop(listener);
        let probe = TcpProbe::new(addr.to_string()).with_timeout(Duration::from_millis(200));
        assert!(!probe.is_connected().await);
    }
}

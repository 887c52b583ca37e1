use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stockdesk_core::domain::alert::{Alert, AlertId};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;

#[async_trait]
pub trait AlertFeed: Send + Sync {
    /// Unread alerts, newest first.
    async fn unread_alerts(&self) -> Result<Vec<Alert>, ClientError>;
    async fn mark_read(&self, id: &AlertId) -> Result<(), ClientError>;
}

pub struct HttpAlertFeed {
    api: ApiClient,
}

impl HttpAlertFeed {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AlertFeed for HttpAlertFeed {
    async fn unread_alerts(&self) -> Result<Vec<Alert>, ClientError> {
        self.api.get_json("/alerts").await
    }

    async fn mark_read(&self, id: &AlertId) -> Result<(), ClientError> {
        self.api.put_empty(&format!("/alerts/{id}/read")).await?;
        debug!(event_name = "client.alerts.marked_read", alert_id = %id, "alert marked read");
        Ok(())
    }
}

/// Periodically refreshes the unread alert list in the background.
pub struct AlertPoller {
    feed: Arc<dyn AlertFeed>,
    interval: Duration,
}

impl AlertPoller {
    pub fn new(feed: Arc<dyn AlertFeed>, interval: Duration) -> Self {
        Self { feed, interval }
    }

    /// Spawns the polling task. The first fetch happens immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> AlertPollerHandle {
        let shutdown = Arc::new(Notify::new());
        let (sender, receiver) = watch::channel(Vec::new());
        let task = tokio::spawn(poll_loop(self.feed, self.interval, Arc::clone(&shutdown), sender));

        AlertPollerHandle { shutdown, receiver, task: Some(task) }
    }
}

async fn poll_loop(
    feed: Arc<dyn AlertFeed>,
    period: Duration,
    shutdown: Arc<Notify>,
    sender: watch::Sender<Vec<Alert>>,
) {
    info!(
        event_name = "client.alerts.poller_started",
        interval_ms = period.as_millis() as u64,
        "alert poller started"
    );

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.notified() => break,
            _ = ticker.tick() => {
                match feed.unread_alerts().await {
                    Ok(alerts) => {
                        debug!(
                            event_name = "client.alerts.refreshed",
                            unread = alerts.len(),
                            "alert list refreshed"
                        );
                        sender.send_replace(alerts);
                    }
                    Err(error) => {
                        warn!(
                            event_name = "client.alerts.refresh_failed",
                            error_class = error.class(),
                            error = %error,
                            "alert refresh failed; keeping previous list"
                        );
                    }
                }
            }
        }
    }

    info!(event_name = "client.alerts.poller_stopped", "alert poller stopped");
}

/// Running poller. Dropping the handle aborts the task; [`stop`](Self::stop)
/// shuts it down and waits for it to finish.
pub struct AlertPollerHandle {
    shutdown: Arc<Notify>,
    receiver: watch::Receiver<Vec<Alert>>,
    task: Option<JoinHandle<()>>,
}

impl AlertPollerHandle {
    pub fn subscribe(&self) -> watch::Receiver<Vec<Alert>> {
        self.receiver.clone()
    }

    pub fn latest(&self) -> Vec<Alert> {
        self.receiver.borrow().clone()
    }

    pub async fn stop(mut self) {
        self.shutdown.notify_one();
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                warn!(
                    event_name = "client.alerts.poller_join_failed",
                    error = %error,
                    "alert poller task ended abnormally"
                );
            }
        }
    }
}

impl Drop for AlertPollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use stockdesk_core::domain::alert::{Alert, AlertId, AlertKind};
    use stockdesk_core::domain::product::ProductId;

    use super::{AlertFeed, AlertPoller};
    use crate::error::ClientError;
    use crate::memory::InMemoryAlertFeed;

    fn alert(id: &str) -> Alert {
        Alert {
            id: AlertId(id.to_owned()),
            product_id: ProductId("p-3".to_owned()),
            kind: AlertKind::OutOfStock,
            message: "Pixel 7 is out of stock (Stock: 0)".to_owned(),
            is_read: false,
            created_at: Utc.with_ymd_and_hms(2025, 2, 1, 10, 30, 0).single().expect("timestamp"),
        }
    }

    /// Succeeds once, then fails every call.
    struct FlakyFeed {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AlertFeed for FlakyFeed {
        async fn unread_alerts(&self) -> Result<Vec<Alert>, ClientError> {
            match self.calls.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(vec![alert("a-1")]),
                _ => Err(ClientError::Network("connection refused".to_owned())),
            }
        }

        async fn mark_read(&self, _id: &AlertId) -> Result<(), ClientError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn first_fetch_happens_immediately() {
        let feed = Arc::new(InMemoryAlertFeed::new(vec![alert("a-1"), alert("a-2")]));
        let handle = AlertPoller::new(feed, Duration::from_secs(3600)).start();

        let mut updates = handle.subscribe();
        tokio::time::timeout(Duration::from_secs(2), updates.changed())
            .await
            .expect("first fetch should not wait for the interval")
            .expect("poller should still be running");

        assert_eq!(handle.latest().len(), 2);
        handle.stop().await;
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_list() {
        let feed = Arc::new(FlakyFeed { calls: AtomicUsize::new(0) });
        let handle = AlertPoller::new(feed.clone(), Duration::from_millis(10)).start();

        tokio::time::timeout(Duration::from_secs(2), async {
            while feed.calls.load(Ordering::SeqCst) < 3 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("poller should keep polling after failures");

        assert_eq!(handle.latest(), vec![alert("a-1")]);
        handle.stop().await;
    }

    #[tokio::test]
    async fn stop_ends_polling() {
        let feed = Arc::new(FlakyFeed { calls: AtomicUsize::new(0) });
        let handle = AlertPoller::new(feed.clone(), Duration::from_millis(10)).start();
        let updates = handle.subscribe();

        handle.stop().await;
        let calls_after_stop = feed.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(feed.calls.load(Ordering::SeqCst), calls_after_stop);
        assert!(updates.has_changed().is_err(), "sender is dropped once the task exits");
    }
}

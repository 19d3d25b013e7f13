//! Periodic snapshot fetch plus a redraw tick for the staleness label.
//!
//! Both timers live in a single task and a single `select!`, so they start
//! and stop together. The "last updated" timestamp is captured when a
//! snapshot is built and the redraw tick only re-derives the label from it;
//! the store is never queried on a redraw. A fetch runs as its own task, so
//! a slow store does not hold up the redraw tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::config::Catalog;
use crate::dashboard::DashboardView;
use crate::error::StoreError;
use crate::reading::Reading;
use crate::store::ReadingStore;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct Poller {
    store: Arc<dyn ReadingStore>,
    catalog: Catalog,
    poll_interval: Duration,
    tick_interval: Duration,
}

impl Poller {
    pub fn new(store: Arc<dyn ReadingStore>, catalog: Catalog, poll_interval: Duration) -> Self {
        Self {
            store,
            catalog,
            poll_interval,
            tick_interval: TICK_INTERVAL,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Starts polling on the current runtime.
    ///
    /// Dropping the returned handle cancels the task.
    pub fn spawn(self) -> PollerHandle {
        let cancel = CancellationToken::new();
        let initial = DashboardView::build(&[], &self.catalog, Utc::now());
        let (tx, views) = watch::channel(initial);

        let task = tokio::spawn(self.run(tx, cancel.clone()));

        PollerHandle {
            views,
            task,
            _guard: cancel.drop_guard(),
        }
    }

    /// Runs until `cancel` fires, publishing every new view on `tx`.
    pub async fn run(self, tx: watch::Sender<DashboardView>, cancel: CancellationToken) {
        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut redraw = tokio::time::interval(self.tick_interval);
        redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // last snapshot that was fetched successfully
        let mut snapshot: Vec<Reading> = Vec::new();
        // at most one fetch in flight; dropping the set aborts it
        let mut fetches: JoinSet<Result<Vec<Reading>, StoreError>> = JoinSet::new();

        info!(
            poll_secs = self.poll_interval.as_secs_f64(),
            locations = self.catalog.locations.len(),
            "Poller started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    break;
                }
                _ = poll.tick() => {
                    if fetches.is_empty() {
                        let store = Arc::clone(&self.store);
                        fetches.spawn(async move { store.list_all().await });
                    } else {
                        debug!("Previous fetch still running, skipping poll");
                    }
                }
                Some(joined) = fetches.join_next() => {
                    let fetched = joined.unwrap_or_else(|e| {
                        Err(StoreError::Unavailable(format!("fetch task failed: {e}")))
                    });

                    let now = Utc::now();
                    let view = match fetched {
                        Ok(readings) => {
                            debug!(count = readings.len(), "Snapshot refreshed");
                            snapshot = readings;
                            DashboardView::build(&snapshot, &self.catalog, now)
                        }
                        Err(e) => {
                            warn!(error = %e, kept = snapshot.len(), "Snapshot refresh failed");
                            DashboardView::build(&snapshot, &self.catalog, now)
                                .with_notice(format!("Couldn't refresh occupancy: {e}"))
                        }
                    };

                    tx.send_replace(view);
                }
                _ = redraw.tick() => {
                    let now = Utc::now();
                    tx.send_if_modified(|view| {
                        let before = view.updated.clone();
                        view.tick(now);
                        view.updated != before
                    });
                }
            }
        }

        info!("Poller stopped");
    }
}

/// Running poller. Dropping it stops both timers.
pub struct PollerHandle {
    views: watch::Receiver<DashboardView>,
    task: JoinHandle<()>,
    _guard: DropGuard,
}

impl PollerHandle {
    /// A receiver that observes every published view.
    pub fn views(&self) -> watch::Receiver<DashboardView> {
        self.views.clone()
    }

    /// Cancels the poller and waits for its task to finish.
    pub async fn shutdown(self) {
        drop(self._guard);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Poller task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryReadingStore;
    use crate::reading::{BusyLevel, LocationKey};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn moffitt(floor: &str, level: i64) -> Reading {
        Reading::new(
            LocationKey::floor("Moffitt Library", floor),
            BusyLevel::new(level).unwrap(),
            Utc::now(),
        )
    }

    async fn next_matching(
        views: &mut watch::Receiver<DashboardView>,
        pred: impl Fn(&DashboardView) -> bool,
    ) -> DashboardView {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                {
                    let view = views.borrow_and_update();
                    if pred(&view) {
                        return view.clone();
                    }
                }
                views.changed().await.unwrap();
            }
        })
        .await
        .expect("timed out waiting for view")
    }

    #[tokio::test]
    async fn test_publishes_snapshot_views() {
        let store = Arc::new(MemoryReadingStore::with_readings(vec![moffitt("Floor 1", 2)]));
        let handle = Poller::new(store.clone(), Catalog::default(), Duration::from_millis(20))
            .with_tick_interval(Duration::from_millis(5))
            .spawn();
        let mut views = handle.views();

        let first = next_matching(&mut views, |v| v.rows[0].progress == 40).await;
        assert_eq!(first.updated, "updated just now");
        assert!(first.notice.is_none());

        store.append(&moffitt("Floor 3", 1)).await.unwrap();
        let second = next_matching(&mut views, |v| v.rows[1].progress == 20).await;
        assert_eq!(
            second.recommendation.least_busy,
            vec![LocationKey::floor("Moffitt Library", "Floor 3")]
        );

        handle.shutdown().await;
    }

    struct FlakyStore {
        calls: AtomicUsize,
        inner: MemoryReadingStore,
    }

    #[async_trait]
    impl ReadingStore for FlakyStore {
        async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
            self.inner.append(reading).await
        }

        async fn list_all(&self) -> Result<Vec<Reading>, StoreError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.inner.list_all().await
            } else {
                Err(StoreError::Unavailable("connection refused".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_snapshot() {
        let store = Arc::new(FlakyStore {
            calls: AtomicUsize::new(0),
            inner: MemoryReadingStore::with_readings(vec![moffitt("Floor 4", 3)]),
        });
        let handle = Poller::new(store, Catalog::default(), Duration::from_millis(20)).spawn();
        let mut views = handle.views();

        let degraded = next_matching(&mut views, |v| v.notice.is_some()).await;

        assert_eq!(degraded.rows[2].progress, 60);
        assert!(degraded.notice.unwrap().contains("connection refused"));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_unavailable_store_shows_empty_dashboard() {
        let store = Arc::new(FlakyStore {
            calls: AtomicUsize::new(1),
            inner: MemoryReadingStore::new(),
        });
        let handle = Poller::new(store, Catalog::default(), Duration::from_secs(60)).spawn();
        let mut views = handle.views();

        let view = next_matching(&mut views, |v| v.notice.is_some()).await;

        assert_eq!(view.updated, "No updates yet");
        assert!(view.recommendation.all_busy);
        assert!(view.recommendation.least_busy.is_empty());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_poller() {
        let handle = Poller::new(Arc::new(MemoryReadingStore::new()), Catalog::default(), Duration::from_secs(60))
            .with_tick_interval(Duration::from_millis(5))
            .spawn();
        let mut views = handle.views();

        drop(handle);

        // the sender closes once the task has exited
        tokio::time::timeout(Duration::from_secs(5), async {
            while views.changed().await.is_ok() {}
        })
        .await
        .expect("poller kept running after its handle was dropped");
    }

    #[tokio::test]
    async fn test_cancel_stops_run() {
        let cancel = CancellationToken::new();
        let (tx, _rx) = watch::channel(DashboardView::build(&[], &Catalog::default(), Utc::now()));
        let poller = Poller::new(Arc::new(MemoryReadingStore::new()), Catalog::default(), Duration::from_secs(60));

        let task = tokio::spawn(poller.run(tx, cancel.clone()));
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("poller did not stop")
            .unwrap();
    }

    struct SlowStore {
        calls: AtomicUsize,
        reading: Reading,
    }

    #[async_trait]
    impl ReadingStore for SlowStore {
        async fn append(&self, _reading: &Reading) -> Result<(), StoreError> {
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<Reading>, StoreError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
                tokio::time::sleep(Duration::from_secs(3)).await;
            }
            Ok(vec![self.reading.clone()])
        }
    }

    #[tokio::test]
    async fn test_label_ticks_while_fetch_is_slow() {
        let mut reading = moffitt("Floor 1", 2);
        reading.submitted_at = Utc::now() - chrono::Duration::milliseconds(299_500);
        let store = Arc::new(SlowStore {
            calls: AtomicUsize::new(0),
            reading,
        });
        let handle = Poller::new(store.clone(), Catalog::default(), Duration::from_millis(50))
            .with_tick_interval(Duration::from_millis(10))
            .spawn();
        let mut views = handle.views();

        next_matching(&mut views, |v| v.last_update.is_some()).await;

        let aged = tokio::time::timeout(
            Duration::from_millis(1500),
            next_matching(&mut views, |v| v.updated == "5 minutes ago"),
        )
        .await
        .expect("label froze while a fetch was in flight");
        assert_eq!(aged.rows[0].progress, 40);

        // the slow fetch is never duplicated by later poll ticks
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);

        handle.shutdown().await;
    }
}

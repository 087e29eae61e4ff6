use futures_util::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Something that reloads its on-chain state. Failed reads degrade to
/// default values inside the view, so a refresh itself cannot fail.
pub trait Refresh: Send + Sync {
    fn view_name(&self) -> &'static str;

    fn refresh_view(&self) -> BoxFuture<'_, ()>;
}

/// Periodic refresh of a view, stopped when the poller is dropped
pub struct Poller {
    view_name: &'static str,
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn start(target: Arc<dyn Refresh>, interval: Duration) -> Self {
        let view_name = target.view_name();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                log::debug!("Refreshing view {}", view_name);
                target.refresh_view().await;
            }
        });
        log::debug!("Started poller for view {} every {:?}", view_name, interval);
        Self { view_name, handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        drop(self)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        log::debug!("Stopping poller for view {}", self.view_name);
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    impl Refresh for Counter {
        fn view_name(&self) -> &'static str {
            "counter"
        }

        fn refresh_view(&self) -> BoxFuture<'_, ()> {
            async move {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_poller_stops_on_drop() {
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let poller = Poller::start(counter.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(55)).await;
        assert!(poller.is_running());
        poller.stop();

        let after_stop = counter.0.load(Ordering::SeqCst);
        assert!(after_stop >= 2);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(counter.0.load(Ordering::SeqCst) <= after_stop + 1);
    }
}

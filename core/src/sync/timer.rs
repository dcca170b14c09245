use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const MIN_CADENCE: Duration = Duration::from_millis(1);

/// Owned periodic timer; stopping or dropping it cancels future ticks.
///
/// The first tick fires one full cadence after `start`. Each tick's work is
/// spawned on its own, so a slow fetch never delays the schedule and work
/// already started is not aborted by `stop`.
#[derive(Debug)]
pub struct RefreshTimer {
    cadence: Duration,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    pub fn new(cadence: Duration) -> Self {
        Self {
            cadence: cadence.max(MIN_CADENCE),
            handle: None,
        }
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Starts ticking, replacing any schedule already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();
        let cadence = self.cadence;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + cadence, cadence);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tokio::spawn(on_tick());
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_timer(cadence: Duration) -> (RefreshTimer, Arc<AtomicUsize>) {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut timer = RefreshTimer::new(cadence);
        let counter = ticks.clone();
        timer.start(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (timer, ticks)
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_cadence_after_start() {
        let (timer, ticks) = counting_timer(Duration::from_secs(5));
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(5_010)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_future_ticks() {
        let (mut timer, ticks) = counting_timer(Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        timer.stop();
        assert!(!timer.is_running());
        tokio::time::sleep(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_timer() {
        let (timer, ticks) = counting_timer(Duration::from_secs(1));
        drop(timer);
        tokio::time::sleep(Duration::from_secs(3)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn zero_cadence_is_clamped() {
        assert_eq!(RefreshTimer::new(Duration::ZERO).cadence(), MIN_CADENCE);
    }
}

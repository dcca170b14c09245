use crate::model::{Basement, DirectionalCounts, OccupancySnapshot};
use crate::prelude::{Gateway, GatewayResult};
use crate::sync::feed::{Completion, Feed, RefreshTicket, RefreshTrigger, ResponseOrdering};
use crate::sync::timer::RefreshTimer;
use crate::sync::{lock, ConsumerKind};
use crate::telemetry::{LogManager, Metrics, MetricsRecorder};
use chrono::Utc;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Something a consumer polls.
pub trait FeedSource: Send + Sync + 'static {
    type Output: Send + 'static;

    fn describe(&self) -> String;

    fn fetch(&self) -> impl Future<Output = GatewayResult<Self::Output>> + Send;
}

/// Spots plus the occupied count, fetched atomically.
pub struct StatsSource<G> {
    gateway: Arc<G>,
}

impl<G> StatsSource<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

impl<G: Gateway + 'static> FeedSource for StatsSource<G> {
    type Output = OccupancySnapshot;

    fn describe(&self) -> String {
        "occupancy stats".into()
    }

    fn fetch(&self) -> impl Future<Output = GatewayResult<OccupancySnapshot>> + Send {
        self.gateway.fetch_stats()
    }
}

/// Front/right/left counts for one zone.
pub struct DirectionalSource<G> {
    gateway: Arc<G>,
    zone: String,
}

impl<G> DirectionalSource<G> {
    pub fn new(gateway: Arc<G>, zone: impl Into<String>) -> Self {
        Self {
            gateway,
            zone: zone.into(),
        }
    }

    pub fn for_basement(gateway: Arc<G>, basement: Basement) -> Self {
        Self::new(gateway, basement.zone_token())
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }
}

impl<G: Gateway + 'static> FeedSource for DirectionalSource<G> {
    type Output = DirectionalCounts;

    fn describe(&self) -> String {
        format!("directional counts for {}", self.zone)
    }

    fn fetch(&self) -> impl Future<Output = GatewayResult<DirectionalCounts>> + Send {
        self.gateway.fetch_directional_counts(&self.zone)
    }
}

struct ConsumerState<T> {
    feed: Mutex<Feed<T>>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

async fn run_refresh<S: FeedSource>(
    source: Arc<S>,
    state: Arc<ConsumerState<S::Output>>,
    trigger: RefreshTrigger,
) {
    let ticket = lock(&state.feed).begin(trigger);
    finish_refresh(source, state, ticket).await;
}

async fn finish_refresh<S: FeedSource>(
    source: Arc<S>,
    state: Arc<ConsumerState<S::Output>>,
    ticket: RefreshTicket,
) {
    state.logger.detail(&format!(
        "refresh #{} ({:?}) of {}",
        ticket.seq,
        ticket.trigger,
        source.describe()
    ));

    let result = source.fetch().await;
    let completion = lock(&state.feed).complete(ticket, result, Utc::now());

    match completion {
        Completion::Succeeded => {
            state.metrics.record_success();
            state.logger.detail(&format!("refresh #{} applied", ticket.seq));
        }
        Completion::Failed(message) => {
            state.metrics.record_failure();
            state.logger.warn(&message);
        }
        Completion::Discarded => {
            state.metrics.record_discarded();
            state
                .logger
                .detail(&format!("refresh #{} discarded", ticket.seq));
        }
    }
}

/// One consumer: its feed, its source and its own refresh timer.
///
/// `mount`, `retarget` and `reselect` spawn work and must run inside a tokio
/// runtime.
pub struct Poller<S: FeedSource> {
    kind: ConsumerKind,
    source: Arc<S>,
    state: Arc<ConsumerState<S::Output>>,
    timer: RefreshTimer,
    mounted: bool,
}

impl<S: FeedSource> Poller<S> {
    pub fn new(
        kind: ConsumerKind,
        source: S,
        cadence: Duration,
        ordering: ResponseOrdering,
    ) -> Self {
        Self {
            kind,
            source: Arc::new(source),
            state: Arc::new(ConsumerState {
                feed: Mutex::new(Feed::new(ordering)),
                metrics: MetricsRecorder::new(),
                logger: LogManager::new(kind.name()),
            }),
            timer: RefreshTimer::new(cadence),
            mounted: false,
        }
    }

    pub fn kind(&self) -> ConsumerKind {
        self.kind
    }

    pub fn cadence(&self) -> Duration {
        self.timer.cadence()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Fetches immediately, with the spinner raised, and starts the periodic timer.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.state.logger.record(&format!(
            "mounted, polling every {:?}",
            self.timer.cadence()
        ));
        self.kick(RefreshTrigger::Initial);
        self.start_timer();
    }

    /// Stops the timer; responses still in flight are discarded on arrival.
    pub fn teardown(&mut self) {
        self.timer.stop();
        let dropped = lock(&self.state.feed).cancel_in_flight();
        if self.mounted {
            self.state
                .logger
                .record(&format!("torn down, {dropped} request(s) orphaned"));
        }
        self.mounted = false;
    }

    /// Operator-initiated refresh; shows the spinner until it completes.
    pub async fn refresh(&self) {
        run_refresh(self.source.clone(), self.state.clone(), RefreshTrigger::Manual).await;
    }

    /// Operator-initiated refresh that runs in the background; the spinner
    /// flag is raised before this returns.
    pub fn request_refresh(&self) -> JoinHandle<()> {
        let ticket = lock(&self.state.feed).begin(RefreshTrigger::Manual);
        tokio::spawn(finish_refresh(self.source.clone(), self.state.clone(), ticket))
    }

    /// Switches to a new source (zone change): drops pending responses and
    /// the data of the old selection, fetches now and restarts the timer.
    pub fn retarget(&mut self, source: S) {
        self.source = Arc::new(source);
        lock(&self.state.feed).clear();
        self.restart();
    }

    /// Selector change that keeps the same source (basement change on the map).
    pub fn reselect(&mut self) {
        self.restart();
    }

    fn restart(&mut self) {
        self.timer.stop();
        lock(&self.state.feed).cancel_in_flight();
        self.state
            .logger
            .record(&format!("selector changed to {}", self.source.describe()));
        if self.mounted {
            self.kick(RefreshTrigger::Selector);
            self.start_timer();
        }
    }

    fn kick(&self, trigger: RefreshTrigger) {
        tokio::spawn(run_refresh(self.source.clone(), self.state.clone(), trigger));
    }

    fn start_timer(&mut self) {
        let source = self.source.clone();
        let state = self.state.clone();
        self.timer.start(move || {
            run_refresh(source.clone(), state.clone(), RefreshTrigger::Timer)
        });
    }

    /// Reads the feed under its lock.
    pub fn with_feed<R>(&self, read: impl FnOnce(&Feed<S::Output>) -> R) -> R {
        read(&lock(&self.state.feed))
    }

    pub fn metrics(&self) -> Metrics {
        self.state.metrics.snapshot()
    }
}

impl<S: FeedSource> Drop for Poller<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::scripted::ScriptedGateway;
    use crate::model::{Heading, Spot};
    use crate::prelude::TransportError;
    use crate::sync::{DataState, RefreshPhase};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn spots(reserved_flags: &[bool]) -> Vec<Spot> {
        reserved_flags
            .iter()
            .enumerate()
            .map(|(idx, &reserved)| Spot::new(idx as i64, format!("A{idx:02} Zone B1"), reserved))
            .collect()
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn manual_refresh_renders_endpoint_derived_availability() {
        let gateway = Arc::new(ScriptedGateway::default());
        // One flag set, endpoint says three occupied.
        gateway.push_spots(Ok(spots(&[true, false, false, false, false])));
        gateway.push_occupied(Ok(3));

        let poller = Poller::new(
            ConsumerKind::HomeSummary,
            StatsSource::new(gateway),
            Duration::from_secs(30),
            ResponseOrdering::LatestCompleted,
        );
        poller.refresh().await;

        let (available, total) =
            poller.with_feed(|feed| feed.data().map(|s| (s.available, s.total)).unwrap());
        assert_eq!((available, total), (2, 5));
        assert_eq!(poller.metrics().succeeded, 1);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.push_spots(Ok(spots(&[false, true])));
        gateway.push_occupied(Ok(1));
        gateway.push_spots(Ok(spots(&[true, true])));
        gateway.push_occupied(Err(TransportError::Timeout("10s".into())));

        let poller = Poller::new(
            ConsumerKind::MapDetail,
            StatsSource::new(gateway),
            Duration::from_secs(15),
            ResponseOrdering::LatestCompleted,
        );
        poller.refresh().await;
        poller.refresh().await;

        poller.with_feed(|feed| {
            assert_eq!(feed.data_state(), DataState::Stale);
            assert_eq!(feed.data().unwrap().spots, spots(&[false, true]));
            assert!(feed.error().unwrap().contains("timed out"));
        });
        assert_eq!(poller.metrics().failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetches_now_then_on_cadence() {
        let gateway = Arc::new(ScriptedGateway::default());
        for occupied in [1, 2, 3] {
            gateway.push_spots(Ok(spots(&[true, true, true, false])));
            gateway.push_occupied(Ok(occupied));
        }

        let mut poller = Poller::new(
            ConsumerKind::HomeSummary,
            StatsSource::new(gateway),
            Duration::from_secs(30),
            ResponseOrdering::LatestCompleted,
        );
        poller.mount();
        settle().await;
        assert_eq!(poller.with_feed(|f| f.data().unwrap().occupied), 1);
        assert!(!poller.with_feed(|f| f.shows_spinner()));

        tokio::time::sleep(Duration::from_secs(31)).await;
        settle().await;
        assert_eq!(poller.with_feed(|f| f.data().unwrap().occupied), 2);

        poller.teardown();
        tokio::time::sleep(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(poller.with_feed(|f| f.data().unwrap().occupied), 2);
        assert_eq!(poller.metrics().succeeded, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retarget_switches_zone_and_fetches_immediately() {
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.set_directional(Heading::Front, "Zone B1", Ok(json!(1)));
        gateway.set_directional(Heading::Right, "Zone B1", Ok(json!(2)));
        gateway.set_directional(Heading::Left, "Zone B1", Ok(json!(3)));
        gateway.set_directional(Heading::Front, "Zone B2", Ok(json!(7)));
        gateway.set_directional(Heading::Right, "Zone B2", Ok(json!("n/a")));
        gateway.set_directional(Heading::Left, "Zone B2", Ok(json!(9)));

        let mut poller = Poller::new(
            ConsumerKind::DirectionalCounts,
            DirectionalSource::for_basement(gateway.clone(), Basement::One),
            Duration::from_secs(5),
            ResponseOrdering::LatestCompleted,
        );
        poller.mount();
        settle().await;
        assert_eq!(poller.with_feed(|f| f.data().unwrap().front), 1);

        poller.retarget(DirectionalSource::for_basement(gateway, Basement::Two));
        settle().await;
        let counts = poller.with_feed(|f| f.data().cloned().unwrap());
        assert_eq!(counts.zone, "Zone B2");
        assert_eq!((counts.front, counts.right, counts.left), (7, 0, 9));
        assert_eq!(poller.source().zone(), "Zone B2");
    }

    #[tokio::test(start_paused = true)]
    async fn background_refresh_raises_spinner_until_done() {
        let gateway = Arc::new(GatedGateway::default());
        let poller = Poller::new(
            ConsumerKind::HomeSummary,
            StatsSource::new(gateway.clone()),
            Duration::from_secs(30),
            ResponseOrdering::LatestCompleted,
        );
        let pending = poller.request_refresh();
        assert!(poller.with_feed(|f| f.shows_spinner()));

        gateway.release.notify_one();
        pending.await.unwrap();
        poller.with_feed(|f| {
            assert!(!f.shows_spinner());
            assert_eq!(f.phase(), RefreshPhase::Success);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetch_shows_spinner_while_pending() {
        let gateway = Arc::new(GatedGateway::default());
        let mut poller = Poller::new(
            ConsumerKind::MapDetail,
            StatsSource::new(gateway.clone()),
            Duration::from_secs(15),
            ResponseOrdering::LatestCompleted,
        );
        poller.mount();
        settle().await;
        poller.with_feed(|f| {
            assert!(f.shows_spinner());
            assert_eq!(f.phase(), RefreshPhase::Refreshing);
        });

        gateway.release.notify_one();
        settle().await;
        poller.with_feed(|f| {
            assert!(!f.shows_spinner());
            assert_eq!(f.phase(), RefreshPhase::Success);
        });
    }

    /// Gateway whose spot read blocks until released, to hold a request in flight.
    #[derive(Default)]
    struct GatedGateway {
        release: Notify,
        calls: AtomicUsize,
    }

    impl Gateway for GatedGateway {
        async fn fetch_all_spots(&self) -> GatewayResult<Vec<Spot>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                self.release.notified().await;
            }
            Ok(spots(&[call == 0]))
        }

        async fn fetch_occupied_count(&self) -> GatewayResult<u32> {
            Ok(0)
        }

        async fn fetch_directional_count(&self, _: Heading, _: &str) -> GatewayResult<u32> {
            Ok(0)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn response_from_before_selector_change_is_discarded() {
        let gateway = Arc::new(GatedGateway::default());
        let mut poller = Poller::new(
            ConsumerKind::MapDetail,
            StatsSource::new(gateway.clone()),
            Duration::from_secs(15),
            ResponseOrdering::LatestCompleted,
        );
        poller.mount();
        settle().await;
        assert_eq!(poller.with_feed(|f| f.phase()), RefreshPhase::Refreshing);

        poller.reselect();
        settle().await;
        assert_eq!(poller.with_feed(|f| f.data().unwrap().spots.clone()), spots(&[false]));

        gateway.release.notify_one();
        settle().await;
        assert_eq!(poller.with_feed(|f| f.data().unwrap().spots.clone()), spots(&[false]));
        assert_eq!(poller.metrics().discarded, 1);
    }
}

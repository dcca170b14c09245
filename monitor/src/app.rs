//! Owns the three consumers and mounts only the ones the current view shows.

use crate::commands::{Command, View};
use crate::render;
use chrono::{DateTime, Utc};
use log::info;
use parkcore::config::ClientConfig;
use parkcore::guidance::{Autoplay, GuidanceSequencer, DEFAULT_DWELL};
use parkcore::layout::{ExpandedSections, SectionNames};
use parkcore::model::Basement;
use parkcore::sync::{lock, ConsumerKind, DirectionalSource, Poller, StatsSource};
use parkcore::Gateway;
use std::sync::{Arc, Mutex};

/// What the input loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Help,
    Quit,
}

pub struct App<G: Gateway + 'static> {
    gateway: Arc<G>,
    view: View,
    basement: Basement,
    expanded: ExpandedSections,
    section_names: SectionNames,
    summary: Poller<StatsSource<G>>,
    map: Poller<StatsSource<G>>,
    directional: Poller<DirectionalSource<G>>,
    guidance: Arc<Mutex<GuidanceSequencer>>,
    autoplay: Option<Autoplay>,
}

impl<G: Gateway + 'static> App<G> {
    /// Builds the consumers and mounts those of `view`. Needs a tokio runtime.
    pub fn new(gateway: Arc<G>, config: &ClientConfig, view: View, basement: Basement) -> Self {
        let poller = |kind| (config.cadence.for_kind(kind), config.ordering);
        let (cadence, ordering) = poller(ConsumerKind::HomeSummary);
        let summary = Poller::new(
            ConsumerKind::HomeSummary,
            StatsSource::new(gateway.clone()),
            cadence,
            ordering,
        );
        let (cadence, ordering) = poller(ConsumerKind::MapDetail);
        let map = Poller::new(
            ConsumerKind::MapDetail,
            StatsSource::new(gateway.clone()),
            cadence,
            ordering,
        );
        let (cadence, ordering) = poller(ConsumerKind::DirectionalCounts);
        let directional = Poller::new(
            ConsumerKind::DirectionalCounts,
            DirectionalSource::for_basement(gateway.clone(), basement),
            cadence,
            ordering,
        );

        let mut app = Self {
            gateway,
            view,
            basement,
            expanded: ExpandedSections::new(),
            section_names: config.section_names.clone(),
            summary,
            map,
            directional,
            guidance: Arc::new(Mutex::new(GuidanceSequencer::default())),
            autoplay: None,
        };
        app.remount();
        app
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn basement(&self) -> Basement {
        self.basement
    }

    pub fn expanded(&self) -> &ExpandedSections {
        &self.expanded
    }

    pub fn mounted(&self) -> Vec<ConsumerKind> {
        let mut kinds = Vec::new();
        if self.summary.is_mounted() {
            kinds.push(ConsumerKind::HomeSummary);
        }
        if self.map.is_mounted() {
            kinds.push(ConsumerKind::MapDetail);
        }
        if self.directional.is_mounted() {
            kinds.push(ConsumerKind::DirectionalCounts);
        }
        kinds
    }

    fn wanted(&self) -> &'static [ConsumerKind] {
        match self.view {
            View::Home => &[ConsumerKind::HomeSummary],
            View::Map => &[ConsumerKind::MapDetail],
            View::Navigate => &[ConsumerKind::DirectionalCounts],
            View::Guide => &[],
        }
    }

    /// Tears down consumers the view no longer shows and mounts the new ones.
    fn remount(&mut self) {
        let wanted = self.wanted();
        let summary = wanted.contains(&ConsumerKind::HomeSummary);
        let map = wanted.contains(&ConsumerKind::MapDetail);
        let directional = wanted.contains(&ConsumerKind::DirectionalCounts);

        if !summary && self.summary.is_mounted() {
            self.summary.teardown();
        }
        if !map && self.map.is_mounted() {
            self.map.teardown();
        }
        if !directional && self.directional.is_mounted() {
            self.directional.teardown();
        }
        if summary && !self.summary.is_mounted() {
            self.summary.mount();
        }
        if map && !self.map.is_mounted() {
            self.map.mount();
        }
        if directional && !self.directional.is_mounted() {
            self.directional.mount();
        }
    }

    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Show(view) => {
                if view != self.view {
                    info!("switching to {view}");
                    self.view = view;
                    self.remount();
                }
            }
            Command::Refresh => {
                // Background refreshes; the spinner shows on the next frame.
                for kind in self.mounted() {
                    match kind {
                        ConsumerKind::HomeSummary => drop(self.summary.request_refresh()),
                        ConsumerKind::MapDetail => drop(self.map.request_refresh()),
                        ConsumerKind::DirectionalCounts => {
                            drop(self.directional.request_refresh())
                        }
                    }
                }
            }
            Command::Select(basement) => self.select(basement),
            Command::Toggle(index) => {
                self.expanded.toggle(index);
            }
            Command::StartGuidance => self.start_guidance(),
            Command::StopGuidance => self.stop_guidance(),
            Command::NextStep => {
                let advance = match &self.autoplay {
                    Some(autoplay) => autoplay.step(),
                    None => lock(&self.guidance).advance(),
                };
                info!("guidance {advance:?}");
            }
            Command::Help => return Flow::Help,
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn select(&mut self, basement: Basement) {
        if basement == self.basement {
            return;
        }
        info!("selecting {basement}");
        self.basement = basement;
        self.expanded.collapse_all();
        self.map.reselect();
        self.directional
            .retarget(DirectionalSource::for_basement(self.gateway.clone(), basement));
    }

    fn start_guidance(&mut self) {
        self.stop_guidance();
        self.autoplay = Some(Autoplay::start(
            self.guidance.clone(),
            DEFAULT_DWELL,
            |frame| {
                info!(
                    "guidance step {}/{}: {}",
                    frame.index + 1,
                    frame.total,
                    frame.instruction
                )
            },
        ));
    }

    fn stop_guidance(&mut self) {
        if let Some(mut autoplay) = self.autoplay.take() {
            autoplay.cancel();
        }
        lock(&self.guidance).stop();
    }

    /// Awaits one refresh of every mounted consumer.
    pub async fn refresh_mounted(&self) {
        if self.summary.is_mounted() {
            self.summary.refresh().await;
        }
        if self.map.is_mounted() {
            self.map.refresh().await;
        }
        if self.directional.is_mounted() {
            self.directional.refresh().await;
        }
    }

    pub fn render(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut lines = vec![format!("== {} | {} ==", self.view, self.basement)];
        match self.view {
            View::Home => lines.extend(self.summary.with_feed(render::render_summary)),
            View::Map => lines.extend(self.map.with_feed(|feed| {
                render::render_map(feed, self.basement, &self.section_names, &self.expanded, now)
            })),
            View::Navigate => {
                let zone = self.directional.source().zone().to_string();
                lines.extend(
                    self.directional
                        .with_feed(|feed| render::render_directional(feed, &zone)),
                );
                let guidance = lock(&self.guidance);
                if guidance.is_active() {
                    lines.extend(render::render_guidance(&guidance.render(), true));
                }
            }
            View::Guide => {
                let guidance = lock(&self.guidance);
                lines.extend(render::render_guidance(
                    &guidance.render(),
                    guidance.is_active(),
                ));
            }
        }
        lines
    }
}

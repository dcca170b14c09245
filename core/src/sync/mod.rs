//! Per-consumer polling of occupancy data.
//!
//! Each consumer (home summary, map detail, directional counts) owns a
//! [`Feed`] state machine, a [`RefreshTimer`] with its own cadence and a
//! source it pulls from. Consumers share nothing.

pub mod feed;
pub mod poller;
pub mod summary;
pub mod timer;

pub use feed::{
    Completion, ConnectivityState, DataState, Feed, Link, RefreshPhase, RefreshTicket,
    RefreshTrigger, ResponseOrdering, FAILURE_BANNER,
};
pub use poller::{DirectionalSource, FeedSource, Poller, StatsSource};
pub use summary::{
    basement_share, basement_tally, format_last_updated, status_level, BasementTally,
    StatusLevel, BASEMENT_SHARES,
};
pub use timer::RefreshTimer;

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// The independently polled views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsumerKind {
    HomeSummary,
    MapDetail,
    DirectionalCounts,
}

impl ConsumerKind {
    pub fn name(self) -> &'static str {
        match self {
            ConsumerKind::HomeSummary => "home-summary",
            ConsumerKind::MapDetail => "map-detail",
            ConsumerKind::DirectionalCounts => "directional-counts",
        }
    }
}

/// Refresh cadence per consumer, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub summary_ms: u64,
    pub map_ms: u64,
    pub directional_ms: u64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            summary_ms: 30_000,
            map_ms: 15_000,
            directional_ms: 5_000,
        }
    }
}

impl CadenceConfig {
    pub fn for_kind(&self, kind: ConsumerKind) -> Duration {
        Duration::from_millis(match kind {
            ConsumerKind::HomeSummary => self.summary_ms,
            ConsumerKind::MapDetail => self.map_ms,
            ConsumerKind::DirectionalCounts => self.directional_ms,
        })
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

use crate::prelude::{GatewayResult, TransportError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message shown in the error banner; the transport detail is appended.
pub const FAILURE_BANNER: &str = "Failed to connect to parking system";

/// What started a refresh. The mount fetch and operator-initiated refreshes
/// show a spinner; timer ticks and selector changes are silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// First fetch when a consumer mounts.
    Initial,
    /// Periodic background tick.
    Timer,
    /// Pull-to-refresh, the refresh button or the retry action.
    Manual,
    /// Zone or basement selector changed.
    Selector,
}

impl RefreshTrigger {
    pub fn shows_spinner(self) -> bool {
        matches!(self, RefreshTrigger::Manual | RefreshTrigger::Initial)
    }
}

/// Which response wins when refreshes overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// The last response to arrive is applied, whenever it was requested.
    #[default]
    LatestCompleted,
    /// Responses to anything but the newest issued request are dropped.
    LatestRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Refreshing,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Connected,
    Offline,
}

/// Connectivity plus the last error; replaced wholesale on every completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityState {
    pub link: Link,
    pub error: Option<String>,
}

impl ConnectivityState {
    pub fn connected() -> Self {
        Self {
            link: Link::Connected,
            error: None,
        }
    }

    pub fn offline(message: impl Into<String>) -> Self {
        Self {
            link: Link::Offline,
            error: Some(message.into()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.link == Link::Connected
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::connected()
    }
}

/// Stamped on each request so late responses can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub seq: u64,
    pub trigger: RefreshTrigger,
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Succeeded,
    Failed(String),
    /// Superseded by a newer request, or issued before a teardown/selector change.
    Discarded,
}

/// How the held data relates to the latest attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataState {
    /// Nothing has ever been fetched.
    NoData,
    /// Data from the latest applied success.
    Current,
    /// Earlier data kept after a failure.
    Stale,
}

/// Refresh state machine for one consumer.
#[derive(Debug)]
pub struct Feed<T> {
    ordering: ResponseOrdering,
    data: Option<T>,
    connectivity: ConnectivityState,
    settled: RefreshPhase,
    last_updated: Option<DateTime<Utc>>,
    issued: u64,
    epoch: u64,
    in_flight: usize,
    spinner_in_flight: usize,
}

impl<T> Feed<T> {
    pub fn new(ordering: ResponseOrdering) -> Self {
        Self {
            ordering,
            data: None,
            connectivity: ConnectivityState::connected(),
            settled: RefreshPhase::Idle,
            last_updated: None,
            issued: 0,
            epoch: 0,
            in_flight: 0,
            spinner_in_flight: 0,
        }
    }

    /// Enters `Refreshing` and hands out the ticket for the new request.
    pub fn begin(&mut self, trigger: RefreshTrigger) -> RefreshTicket {
        self.issued += 1;
        self.in_flight += 1;
        if trigger.shows_spinner() {
            self.spinner_in_flight += 1;
        }
        RefreshTicket {
            seq: self.issued,
            trigger,
            epoch: self.epoch,
        }
    }

    /// Applies a finished request. Data and connectivity change together.
    pub fn complete(
        &mut self,
        ticket: RefreshTicket,
        result: GatewayResult<T>,
        now: DateTime<Utc>,
    ) -> Completion {
        if ticket.epoch != self.epoch {
            return Completion::Discarded;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        if ticket.trigger.shows_spinner() {
            self.spinner_in_flight = self.spinner_in_flight.saturating_sub(1);
        }
        if self.ordering == ResponseOrdering::LatestRequested && ticket.seq < self.issued {
            return Completion::Discarded;
        }

        match result {
            Ok(data) => {
                self.data = Some(data);
                self.connectivity = ConnectivityState::connected();
                self.last_updated = Some(now);
                self.settled = RefreshPhase::Success;
                Completion::Succeeded
            }
            Err(err) => {
                let message = failure_message(&err);
                self.connectivity = ConnectivityState::offline(message.clone());
                self.settled = RefreshPhase::Failed;
                Completion::Failed(message)
            }
        }
    }

    /// Drops the effect of every request issued so far. Returns how many were pending.
    pub fn cancel_in_flight(&mut self) -> usize {
        let pending = self.in_flight;
        self.epoch += 1;
        self.in_flight = 0;
        self.spinner_in_flight = 0;
        pending
    }

    /// Forgets held data, e.g. when it belonged to a previous selection.
    pub fn clear(&mut self) {
        self.data = None;
        self.last_updated = None;
        self.settled = RefreshPhase::Idle;
    }

    pub fn phase(&self) -> RefreshPhase {
        if self.in_flight > 0 {
            RefreshPhase::Refreshing
        } else {
            self.settled
        }
    }

    /// Spinner flag: true while a mount fetch or operator-initiated refresh is pending.
    pub fn shows_spinner(&self) -> bool {
        self.spinner_in_flight > 0
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn data_state(&self) -> DataState {
        match (&self.data, self.connectivity.link) {
            (None, _) => DataState::NoData,
            (Some(_), Link::Connected) => DataState::Current,
            (Some(_), Link::Offline) => DataState::Stale,
        }
    }

    pub fn connectivity(&self) -> &ConnectivityState {
        &self.connectivity
    }

    pub fn error(&self) -> Option<&str> {
        self.connectivity.error.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self::new(ResponseOrdering::default())
    }
}

fn failure_message(err: &TransportError) -> String {
    format!("{FAILURE_BANNER}: {err}")
}

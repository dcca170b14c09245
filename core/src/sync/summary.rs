use crate::model::{Basement, Spot};
use crate::sync::feed::ConnectivityState;
use chrono::{DateTime, Local, Utc};

/// Share of the facility-wide availability attributed to each level on the home view.
pub const BASEMENT_SHARES: [(Basement, f64); 2] = [(Basement::One, 0.6), (Basement::Two, 0.4)];

/// Colour class of the headline availability number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Open,
    Full,
    Offline,
}

pub fn status_level(connectivity: &ConnectivityState, available: i64) -> StatusLevel {
    if !connectivity.is_connected() {
        StatusLevel::Offline
    } else if available == 0 {
        StatusLevel::Full
    } else {
        StatusLevel::Open
    }
}

pub fn basement_share(available: i64, ratio: f64) -> u32 {
    let share = (available as f64 * ratio).floor();
    if share <= 0.0 {
        0
    } else {
        share as u32
    }
}

/// Free and total spots on one level, counted from the reservation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasementTally {
    pub available: usize,
    pub total: usize,
}

impl BasementTally {
    pub fn occupied(&self) -> usize {
        self.total - self.available
    }

    /// Fraction of free spots in `0.0..=1.0`.
    pub fn fill(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.available as f32 / self.total as f32
        }
    }
}

pub fn basement_tally(spots: &[Spot], basement: Basement) -> BasementTally {
    spots
        .iter()
        .filter(|spot| spot.in_basement(basement))
        .fold(BasementTally::default(), |mut tally, spot| {
            tally.total += 1;
            if spot.is_free() {
                tally.available += 1;
            }
            tally
        })
}

pub fn format_last_updated(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last) = last else {
        return "Never".into();
    };
    let elapsed = (now - last).num_seconds().max(0);
    if elapsed < 60 {
        format!("{elapsed}s ago")
    } else if elapsed < 3600 {
        format!("{}m ago", elapsed / 60)
    } else {
        last.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
}

use crate::model::zone::Basement;
use serde::{Deserialize, Serialize};

/// One parking spot as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spot {
    #[serde(rename = "parkingSpotId")]
    pub id: i64,
    #[serde(rename = "parkingSpotName")]
    pub name: String,
    /// `true` when the spot is occupied.
    #[serde(rename = "isReserved")]
    pub reserved: bool,
}

impl Spot {
    pub fn new(id: i64, name: impl Into<String>, reserved: bool) -> Self {
        Self {
            id,
            name: name.into(),
            reserved,
        }
    }

    pub fn is_free(&self) -> bool {
        !self.reserved
    }

    pub fn in_basement(&self, basement: Basement) -> bool {
        self.name.contains(basement.zone_token())
    }
}

/// All known spots plus aggregate counts.
///
/// `occupied` comes from the dedicated endpoint and is never recounted from
/// the reservation flags, so `available` may disagree with the spot list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySnapshot {
    pub spots: Vec<Spot>,
    pub occupied: u32,
    pub total: u32,
    pub available: i64,
}

impl OccupancySnapshot {
    pub fn new(spots: Vec<Spot>, occupied: u32) -> Self {
        let total = u32::try_from(spots.len()).unwrap_or(u32::MAX);
        Self {
            available: i64::from(total) - i64::from(occupied),
            spots,
            occupied,
            total,
        }
    }

    /// Percentage of spots occupied according to the endpoint count.
    pub fn occupancy_rate(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.occupied as f32 / self.total as f32 * 100.0
        }
    }

    pub fn spots_in(&self, basement: Basement) -> impl Iterator<Item = &Spot> {
        self.spots.iter().filter(move |spot| spot.in_basement(basement))
    }
}

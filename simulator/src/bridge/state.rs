use crate::generator::lot::heading_for;
use parkcore::model::{Heading, Spot};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Spot table shared by the HTTP routes and the churn task.
pub struct LotState {
    spots: RwLock<Vec<Spot>>,
    occupied_bias: i64,
}

impl LotState {
    pub fn new(spots: Vec<Spot>, occupied_bias: i64) -> Self {
        Self {
            spots: RwLock::new(spots),
            occupied_bias,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Spot>> {
        self.spots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Spot>> {
        self.spots.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn spots(&self) -> Vec<Spot> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Reserved flags plus the configured bias, never below zero.
    pub fn occupied_count(&self) -> u32 {
        let reserved = self.read().iter().filter(|spot| spot.reserved).count() as i64;
        u32::try_from((reserved + self.occupied_bias).max(0)).unwrap_or(u32::MAX)
    }

    /// Free spots of `zone` lying in `heading`.
    pub fn free_in_direction(&self, heading: Heading, zone: &str) -> u32 {
        let count = self
            .read()
            .iter()
            .filter(|spot| spot.name.contains(zone))
            .enumerate()
            .filter(|(position, spot)| heading_for(*position) == heading && spot.is_free())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Toggles one reservation and returns the updated spot.
    pub fn flip(&self, index: usize) -> Option<Spot> {
        let mut spots = self.write();
        let spot = spots.get_mut(index)?;
        spot.reserved = !spot.reserved;
        Some(spot.clone())
    }
}

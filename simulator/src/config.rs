use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

/// Settings for the stand-in backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub bind: SocketAddr,
    /// Path prefix in front of `/parkingSpot`, e.g. `firstParkingBackEnd`.
    pub prefix: String,
    pub spots_per_basement: usize,
    pub seed: u64,
    /// Probability that a generated spot starts reserved.
    pub occupancy: f64,
    /// Flip one random reservation this often; disabled when absent.
    pub churn_ms: Option<u64>,
    /// Added to the reported occupied count so it can disagree with the flags.
    pub occupied_bias: i64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            prefix: "firstParkingBackEnd".into(),
            spots_per_basement: 60,
            seed: 7,
            occupancy: 0.5,
            churn_ms: None,
            occupied_bias: 0,
        }
    }
}

impl SimulatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading simulator config {}", path_ref.display()))?;
        let config: SimulatorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing simulator config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        bind: SocketAddr,
        prefix: String,
        spots_per_basement: usize,
        seed: u64,
        occupancy: f64,
    ) -> Self {
        Self {
            bind,
            prefix,
            spots_per_basement,
            seed,
            occupancy,
            ..Default::default()
        }
    }
}

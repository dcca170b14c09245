//! In-memory gateway used by the synchronizer tests.

use crate::model::{Heading, Spot};
use crate::prelude::{Gateway, GatewayResult, TransportError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct ScriptedGateway {
    pub spots: Mutex<VecDeque<GatewayResult<Vec<Spot>>>>,
    pub occupied: Mutex<VecDeque<GatewayResult<u32>>>,
    /// Raw payloads per direction, coerced the way the HTTP gateway does.
    pub directional: Mutex<Vec<(Heading, String, GatewayResult<Value>)>>,
}

impl ScriptedGateway {
    pub fn push_spots(&self, result: GatewayResult<Vec<Spot>>) {
        self.spots.lock().unwrap().push_back(result);
    }

    pub fn push_occupied(&self, result: GatewayResult<u32>) {
        self.occupied.lock().unwrap().push_back(result);
    }

    pub fn set_directional(&self, heading: Heading, zone: &str, payload: GatewayResult<Value>) {
        let mut entries = self.directional.lock().unwrap();
        entries.retain(|(h, z, _)| !(*h == heading && z == zone));
        entries.push((heading, zone.to_string(), payload));
    }
}

fn exhausted() -> TransportError {
    TransportError::Network("script exhausted".into())
}

impl Gateway for ScriptedGateway {
    async fn fetch_all_spots(&self) -> GatewayResult<Vec<Spot>> {
        self.spots
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn fetch_occupied_count(&self) -> GatewayResult<u32> {
        self.occupied
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn fetch_directional_count(&self, heading: Heading, zone: &str) -> GatewayResult<u32> {
        let entries = self.directional.lock().unwrap();
        let payload = entries
            .iter()
            .find(|(h, z, _)| *h == heading && z == zone)
            .map(|(_, _, payload)| payload.clone())
            .unwrap_or_else(|| Err(exhausted()))?;
        Ok(crate::gateway::coerce_count(&payload.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OccupancySnapshot;
    use serde_json::json;

    fn spots() -> Vec<Spot> {
        vec![
            Spot::new(1, "A01 Zone B1", true),
            Spot::new(2, "A02 Zone B1", false),
        ]
    }

    #[tokio::test]
    async fn stats_combine_both_reads() {
        let gateway = ScriptedGateway::default();
        gateway.push_spots(Ok(spots()));
        gateway.push_occupied(Ok(1));
        let stats = gateway.fetch_stats().await.unwrap();
        assert_eq!(stats, OccupancySnapshot::new(spots(), 1));
    }

    #[tokio::test]
    async fn stats_fail_when_count_fails() {
        let gateway = ScriptedGateway::default();
        gateway.push_spots(Ok(spots()));
        gateway.push_occupied(Err(TransportError::Timeout("count".into())));
        assert_eq!(
            gateway.fetch_stats().await,
            Err(TransportError::Timeout("count".into()))
        );
    }

    #[tokio::test]
    async fn stats_fail_when_spots_fail() {
        let gateway = ScriptedGateway::default();
        gateway.push_spots(Err(TransportError::Status {
            status: 503,
            url: "/parkingSpot".into(),
        }));
        gateway.push_occupied(Ok(1));
        assert!(gateway.fetch_stats().await.is_err());
    }

    #[tokio::test]
    async fn non_numeric_directional_payload_reads_zero() {
        let gateway = ScriptedGateway::default();
        gateway.set_directional(Heading::Front, "Zone B1", Ok(json!(4)));
        gateway.set_directional(Heading::Right, "Zone B1", Ok(json!("many")));
        gateway.set_directional(Heading::Left, "Zone B1", Ok(json!(null)));
        let counts = gateway.fetch_directional_counts("Zone B1").await.unwrap();
        assert_eq!((counts.front, counts.right, counts.left), (4, 0, 0));
        assert_eq!(counts.zone, "Zone B1");
    }

    #[tokio::test]
    async fn directional_transport_failure_fails_all_three() {
        let gateway = ScriptedGateway::default();
        gateway.set_directional(Heading::Front, "Zone B2", Ok(json!(1)));
        gateway.set_directional(Heading::Right, "Zone B2", Ok(json!(2)));
        gateway.set_directional(
            Heading::Left,
            "Zone B2",
            Err(TransportError::Network("reset".into())),
        );
        assert!(gateway.fetch_directional_counts("Zone B2").await.is_err());
    }
}

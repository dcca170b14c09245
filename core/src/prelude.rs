use crate::model::{DirectionalCounts, Heading, OccupancySnapshot, Spot};
use std::future::Future;

/// The single failure kind surfaced by the gateway.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("network failure: {0}")]
    Network(String),
    #[error("undecodable payload: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = Result<T, TransportError>;

/// Read-only access to the backend that owns spot state.
///
/// Implementations never retry: every call yields a value or exactly one
/// [`TransportError`].
pub trait Gateway: Send + Sync {
    fn fetch_all_spots(&self) -> impl Future<Output = GatewayResult<Vec<Spot>>> + Send;

    fn fetch_occupied_count(&self) -> impl Future<Output = GatewayResult<u32>> + Send;

    /// Free spots in one direction of a zone. Non-numeric payloads read as `0`.
    fn fetch_directional_count(
        &self,
        heading: Heading,
        zone: &str,
    ) -> impl Future<Output = GatewayResult<u32>> + Send;

    /// Spots and occupied count fetched together; either failure fails the whole.
    fn fetch_stats(&self) -> impl Future<Output = GatewayResult<OccupancySnapshot>> + Send {
        async move {
            let (spots, occupied) =
                tokio::try_join!(self.fetch_all_spots(), self.fetch_occupied_count())?;
            Ok(OccupancySnapshot::new(spots, occupied))
        }
    }

    fn fetch_directional_counts(
        &self,
        zone: &str,
    ) -> impl Future<Output = GatewayResult<DirectionalCounts>> + Send {
        async move {
            let (front, right, left) = tokio::try_join!(
                self.fetch_directional_count(Heading::Front, zone),
                self.fetch_directional_count(Heading::Right, zone),
                self.fetch_directional_count(Heading::Left, zone),
            )?;
            Ok(DirectionalCounts {
                zone: zone.to_string(),
                front,
                right,
                left,
            })
        }
    }
}

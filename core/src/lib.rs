//! Occupancy synchronization and spatial partitioning for the parking client.
//!
//! The gateway reads spot state from the backend, each consumer keeps its own
//! polled snapshot and connectivity, the layout modules carve the flat spot
//! list into basement sections and grid groups, and the guidance module plays
//! a fixed walk to a destination spot.

pub mod config;
pub mod gateway;
pub mod guidance;
pub mod layout;
pub mod model;
pub mod prelude;
pub mod sync;
pub mod telemetry;

pub use prelude::{Gateway, GatewayResult, TransportError};

pub mod http;

#[cfg(test)]
pub(crate) mod scripted;

pub use http::{coerce_count, GatewayConfig, HttpGateway};

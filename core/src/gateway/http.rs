use crate::model::{Heading, Spot};
use crate::prelude::{Gateway, GatewayResult, TransportError};
use crate::telemetry::LogManager;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/firstParkingBackEnd";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const SPOTS_PATH: &str = "parkingSpot";
const OCCUPIED_PATH: &str = "parkingSpot/occupied-count";
const COUNT_PATH: &str = "parkingSpot/count";

/// Where the backend lives and how long a single call may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// JSON-over-HTTP gateway backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    logger: LogManager,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            logger: LogManager::new("gateway"),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> GatewayResult<reqwest::Response> {
        let url = self.endpoint(path);
        self.logger.detail(&format!("GET {url} {query:?}"));
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| self.fail(classify(err)))?;

        let status = response.status();
        self.logger.detail(&format!("{status} from {url}"));
        if !status.is_success() {
            return Err(self.fail(TransportError::Status {
                status: status.as_u16(),
                url,
            }));
        }
        Ok(response)
    }

    fn fail(&self, err: TransportError) -> TransportError {
        self.logger.warn(&err.to_string());
        err
    }
}

impl Gateway for HttpGateway {
    async fn fetch_all_spots(&self) -> GatewayResult<Vec<Spot>> {
        let response = self.get(SPOTS_PATH, &[]).await?;
        response
            .json::<Vec<Spot>>()
            .await
            .map_err(|err| self.fail(classify(err)))
    }

    async fn fetch_occupied_count(&self) -> GatewayResult<u32> {
        let response = self.get(OCCUPIED_PATH, &[]).await?;
        let value = response
            .json::<Value>()
            .await
            .map_err(|err| self.fail(classify(err)))?;
        value
            .as_u64()
            .and_then(|count| u32::try_from(count).ok())
            .ok_or_else(|| {
                self.fail(TransportError::Decode(format!(
                    "occupied count is not a count: {value}"
                )))
            })
    }

    async fn fetch_directional_count(&self, heading: Heading, zone: &str) -> GatewayResult<u32> {
        let response = self
            .get(
                COUNT_PATH,
                &[("direction", heading.as_query()), ("name", zone)],
            )
            .await?;
        let body = response
            .text()
            .await
            .map_err(|err| self.fail(classify(err)))?;
        Ok(coerce_count(&body))
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
        TransportError::Status {
            status: status.as_u16(),
            url: err.url().map(|url| url.to_string()).unwrap_or_default(),
        }
    } else {
        TransportError::Network(err.to_string())
    }
}

/// Reads a directional count body; anything that is not a non-negative JSON
/// number becomes `0`.
pub fn coerce_count(body: &str) -> u32 {
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(Value::Number(number)) => {
            if let Some(count) = number.as_u64() {
                u32::try_from(count).unwrap_or(u32::MAX)
            } else {
                match number.as_f64() {
                    Some(value) if value.is_finite() && value >= 0.0 => value as u32,
                    _ => 0,
                }
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_count_accepts_numbers() {
        assert_eq!(coerce_count("12"), 12);
        assert_eq!(coerce_count(" 3\n"), 3);
        assert_eq!(coerce_count("4.9"), 4);
    }

    #[test]
    fn coerce_count_zeroes_non_numeric_payloads() {
        for body in [
            "",
            "null",
            "\"7\"",
            "{\"count\": 5}",
            "[1]",
            "true",
            "-2",
            "NaN",
            "<html>oops</html>",
        ] {
            assert_eq!(coerce_count(body), 0, "payload {body:?}");
        }
    }

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let gateway = HttpGateway::new(&GatewayConfig {
            base_url: "http://127.0.0.1:9/prefix/".into(),
            timeout_ms: 500,
        })
        .unwrap();
        assert_eq!(gateway.base_url(), "http://127.0.0.1:9/prefix");
        assert_eq!(
            gateway.endpoint(OCCUPIED_PATH),
            "http://127.0.0.1:9/prefix/parkingSpot/occupied-count"
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let gateway = HttpGateway::new(&GatewayConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout_ms: 2_000,
        })
        .unwrap();
        let result = gateway.fetch_stats().await;
        assert!(matches!(
            result,
            Err(TransportError::Network(_)) | Err(TransportError::Timeout(_))
        ));
    }
}

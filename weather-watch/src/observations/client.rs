//! Latest-observation HTTP client.

use std::time::Duration;

use crate::domain::{Observation, Station};
use crate::http::{self, UserAgent};

use super::ObservationSource;
use super::convert::convert_observation;
use super::error::ObservationError;
use super::types::ObservationFeature;

/// Configuration for the observation client.
///
/// There is no base URL: each station carries its own absolute
/// observation endpoint from the catalog.
#[derive(Debug, Clone)]
pub struct ObservationClientConfig {
    /// Identifying user agent sent with every request
    pub user_agent: UserAgent,
    pub connect_timeout: Duration,
    /// Overall request timeout, including reading the body
    pub timeout: Duration,
}

impl ObservationClientConfig {
    pub fn new(user_agent: UserAgent) -> Self {
        Self {
            user_agent,
            connect_timeout: http::DEFAULT_CONNECT_TIMEOUT,
            timeout: http::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for per-station latest observations.
#[derive(Debug, Clone)]
pub struct ObservationClient {
    http: reqwest::Client,
}

impl ObservationClient {
    pub fn new(config: ObservationClientConfig) -> Result<Self, ObservationError> {
        let http = http::build_client(&config.user_agent, config.connect_timeout, config.timeout)?;
        Ok(Self { http })
    }

    /// Fetch and normalize the latest observation for `station`.
    pub async fn get_latest(&self, station: &Station) -> Result<Observation, ObservationError> {
        let response = self.http.get(&station.observation_endpoint).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ObservationError::Api {
                status: status.as_u16(),
                message: http::truncate_body(&body),
            });
        }

        let body = response.text().await?;
        let feature: ObservationFeature =
            serde_json::from_str(&body).map_err(|e| ObservationError::Json {
                message: e.to_string(),
                body: Some(http::truncate_body(&body)),
            })?;

        Ok(convert_observation(feature, station.clone(), Some(body)))
    }
}

impl ObservationSource for ObservationClient {
    async fn latest_observation(&self, station: &Station) -> Result<Observation, ObservationError> {
        self.get_latest(station).await
    }
}
